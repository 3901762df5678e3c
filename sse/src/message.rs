use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Trait for getting the SSE event type name
pub trait EventType {
    fn event_type(&self) -> &'static str;
}

/// A notification pushed to a subscriber.
///
/// Events are plain values: the bus clones one per matching slot, so the
/// publisher keeps its original and each queue owns its copy until the
/// consumer dequeues it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    #[serde(rename = "new_message")]
    NewMessage(NewMessage),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMessage {
    pub messages: Vec<MessageNotification>,
}

/// A single delivered message as seen by its recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageNotification {
    /// Message UUID in its hyphenated form.
    pub id: String,
    pub text: String,
    /// Unix timestamp, seconds.
    pub created_at: i64,
}

impl Event {
    pub fn new_message(notification: MessageNotification) -> Self {
        Event::NewMessage(NewMessage {
            messages: vec![notification],
        })
    }

    /// Serialized payload written as the SSE `data:` field.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl EventType for Event {
    fn event_type(&self) -> &'static str {
        match self {
            Event::NewMessage(_) => "new_message",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn notification() -> MessageNotification {
        MessageNotification {
            id: "2f1c6a5e-8d0b-4c53-9a57-0c7d6f3f4b11".to_string(),
            text: "hi".to_string(),
            created_at: 1000,
        }
    }

    #[test]
    fn new_message_serializes_with_type_tag() {
        let event = Event::new_message(notification());
        let value: serde_json::Value = serde_json::from_str(&event.to_json().unwrap()).unwrap();

        assert_eq!(
            value,
            json!({
                "type": "new_message",
                "data": {
                    "messages": [{
                        "id": "2f1c6a5e-8d0b-4c53-9a57-0c7d6f3f4b11",
                        "text": "hi",
                        "created_at": 1000
                    }]
                }
            })
        );
    }

    #[test]
    fn event_type_matches_serialized_tag() {
        let event = Event::new_message(notification());
        let value: serde_json::Value = serde_json::from_str(&event.to_json().unwrap()).unwrap();
        assert_eq!(value["type"], event.event_type());
    }

    #[test]
    fn unknown_event_tag_is_rejected() {
        let raw = r#"{"type":"message_deleted","data":{"messages":[]}}"#;
        assert!(serde_json::from_str::<Event>(raw).is_err());
    }

    #[test]
    fn cloned_event_is_independent_of_original() {
        let original = Event::new_message(notification());
        let mut copy = original.clone();
        let Event::NewMessage(payload) = &mut copy;
        payload.messages[0].text.push_str(" there");

        assert_eq!(original, Event::new_message(notification()));
        assert_ne!(original, copy);
    }
}
