use crate::error::{EntityErrorKind, Error};
use crate::{sessions, users};
use entity_api::{session, user};
use log::*;
use sea_orm::DatabaseConnection;

pub use entity_api::user::{find_by_id, find_by_uuid};

/// Creates a new account. Nicknames are unique; an empty nickname or password is rejected.
pub async fn register(
    db: &DatabaseConnection,
    nickname: &str,
    password: &str,
) -> Result<users::Model, Error> {
    let nickname = nickname.trim();
    if nickname.is_empty() || password.is_empty() {
        warn!("Registration rejected: nickname and password are required");
        return Err(Error::invalid());
    }

    if user::find_by_nickname(db, nickname).await?.is_some() {
        info!("Registration rejected: nickname {nickname} is taken");
        return Err(Error::entity(EntityErrorKind::Conflict));
    }

    // The unique index still guards against a concurrent registration of the
    // same nickname; that surfaces as RecordAlreadyExists and maps to Conflict.
    let user = user::create(db, nickname, password).await?;
    info!("Registered user {} ({})", user.nickname, user.uuid);
    Ok(user)
}

/// Checks credentials and opens a new session. Every login gets its own session key.
pub async fn login(
    db: &DatabaseConnection,
    nickname: &str,
    password: &str,
) -> Result<(sessions::Model, users::Model), Error> {
    let user = user::authenticate(db, nickname, password)
        .await
        .inspect_err(|e| debug!("Login failed for {nickname}: {e}"))?;

    let session = session::create(db, user.id).await?;
    debug!("User {} logged in", user.uuid);
    Ok((session, user))
}

/// Resolves the caller behind a session key.
pub async fn find_by_session_key(
    db: &DatabaseConnection,
    session_key: &str,
) -> Result<users::Model, Error> {
    session::find_user_by_session_key(db, session_key)
        .await?
        .ok_or_else(|| Error::entity(EntityErrorKind::Unauthenticated))
}

// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(test)]
#[cfg(feature = "mock")]
mod mock_tests {
    use super::*;
    use crate::error::{DomainErrorKind, InternalErrorKind};
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    fn stored_user(nickname: &str, password: &str) -> users::Model {
        let now = Utc::now();
        users::Model {
            id: 1,
            uuid: Uuid::new_v4(),
            nickname: nickname.to_string(),
            password: user::generate_hash(password),
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn entity_kind(err: Error) -> EntityErrorKind {
        let DomainErrorKind::Internal(InternalErrorKind::Entity(kind)) = err.error_kind;
        kind
    }

    #[tokio::test]
    async fn register_rejects_empty_nickname() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let err = register(&db, "   ", "secret").await.unwrap_err();

        assert_eq!(entity_kind(err), EntityErrorKind::Invalid);
    }

    #[tokio::test]
    async fn register_rejects_empty_password() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let err = register(&db, "alice", "").await.unwrap_err();

        assert_eq!(entity_kind(err), EntityErrorKind::Invalid);
    }

    #[tokio::test]
    async fn register_rejects_taken_nickname() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored_user("alice", "secret")]])
            .into_connection();

        let err = register(&db, "alice", "other").await.unwrap_err();

        assert_eq!(entity_kind(err), EntityErrorKind::Conflict);
    }

    #[tokio::test]
    async fn register_creates_new_user() -> Result<(), Error> {
        let created = stored_user("alice", "secret");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<users::Model>::new(), vec![created.clone()]])
            .into_connection();

        let user = register(&db, "alice", "secret").await?;

        assert_eq!(user, created);
        Ok(())
    }

    #[tokio::test]
    async fn login_opens_a_session() -> Result<(), Error> {
        let stored = stored_user("alice", "secret");
        let opened = sessions::Model {
            id: 1,
            session_key: Uuid::new_v4().to_string(),
            user_id: stored.id,
            created_at: Utc::now().into(),
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored.clone()]])
            .append_query_results([vec![opened.clone()]])
            .into_connection();

        let (session, user) = login(&db, "alice", "secret").await?;

        assert_eq!(session, opened);
        assert_eq!(user, stored);
        Ok(())
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_unauthenticated() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored_user("alice", "secret")]])
            .into_connection();

        let err = login(&db, "alice", "nope").await.unwrap_err();

        assert_eq!(entity_kind(err), EntityErrorKind::Unauthenticated);
    }

    #[tokio::test]
    async fn login_with_unknown_nickname_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<users::Model>::new()])
            .into_connection();

        let err = login(&db, "nobody", "secret").await.unwrap_err();

        assert_eq!(entity_kind(err), EntityErrorKind::NotFound);
    }

    #[tokio::test]
    async fn unknown_session_key_is_unauthenticated() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<users::Model>::new()])
            .into_connection();

        let err = find_by_session_key(&db, "stale").await.unwrap_err();

        assert_eq!(entity_kind(err), EntityErrorKind::Unauthenticated);
    }
}
