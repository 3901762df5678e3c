//! Per-subscriber delivery: a dedicated thread that blocks on its slot and
//! forwards each event to the subscriber's transport.

use crate::bus::EventBus;
use crate::error::{Error, ErrorKind, Result};
use crate::message::EventType;
use crate::slot::SlotIndex;
use axum::response::sse::Event as SseFrame;
use log::*;
use std::convert::Infallible;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

/// Channel feeding an axum `Sse` response stream.
pub type SseSender = UnboundedSender<std::result::Result<SseFrame, Infallible>>;

/// Outbound side of a subscriber connection.
pub trait Transport: Send {
    /// Writes one serialized event. Any error is fatal for the connection.
    fn write(&mut self, event_type: &str, data: String) -> Result<()>;

    /// True once the other end has gone away.
    fn is_closed(&self) -> bool;
}

impl Transport for SseSender {
    fn write(&mut self, event_type: &str, data: String) -> Result<()> {
        let frame = SseFrame::default().event(event_type).data(data);
        self.send(Ok(frame))
            .map_err(|_| Error::new(ErrorKind::Transport))
    }

    fn is_closed(&self) -> bool {
        UnboundedSender::is_closed(self)
    }
}

pub struct DeliveryLoop<T> {
    bus: Arc<EventBus>,
    index: SlotIndex,
    transport: T,
    retry_backoff: Duration,
}

impl<T> DeliveryLoop<T>
where
    T: Transport + 'static,
{
    pub fn new(bus: Arc<EventBus>, index: SlotIndex, transport: T, retry_backoff: Duration) -> Self {
        Self {
            bus,
            index,
            transport,
            retry_backoff,
        }
    }

    /// Runs until a write to the transport fails, at which point the slot is
    /// disconnected. A blocked wait is only interrupted by a new event for this
    /// slot, so a vanished subscriber is noticed on the next delivery attempt.
    ///
    /// A slot torn down by someone else also ends the loop: its index may be
    /// handed to another user, whose events must never reach this transport.
    pub fn run(mut self) {
        let index = self.index;

        loop {
            let event = match self.bus.wait_for_event(index) {
                Ok(event) => event,
                Err(e) if matches!(e.error_kind, ErrorKind::Disconnected | ErrorKind::InvalidSlot) => {
                    info!("Slot {index} is no longer connected ({e}), stopping delivery");
                    return;
                }
                Err(e) => {
                    error!("Failed to retrieve event from slot {index}: {e}");
                    if self.transport.is_closed() {
                        info!("Transport for slot {index} is closed, stopping delivery");
                        return;
                    }
                    thread::sleep(self.retry_backoff);
                    continue;
                }
            };

            let data = match event.to_json() {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to serialize event for slot {index}: {e}");
                    continue;
                }
            };

            trace!("Delivering {} event on slot {index}: {data}", event.event_type());

            if let Err(e) = self.transport.write(event.event_type(), data) {
                info!("Subscriber on slot {index} is gone ({e}), disconnecting");
                self.bus.disconnect(index);
                return;
            }
        }
    }

    /// Starts the loop on its own named OS thread.
    pub fn spawn(self) -> Result<JoinHandle<()>> {
        thread::Builder::new()
            .name(format!("sse-delivery-{}", self.index))
            .spawn(move || self.run())
            .map_err(|e| Error::with_source(ErrorKind::Spawn, e))
    }
}
