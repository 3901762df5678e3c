use super::error::{EntityApiErrorKind, Error};
use chrono::Utc;
use entity::users::{ActiveModel, Column, Entity, Model};
use entity::{Id, PublicId};
use log::*;
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use uuid::Uuid;

/// Inserts a new user, hashing `password` before it is stored.
pub async fn create(db: &impl ConnectionTrait, nickname: &str, password: &str) -> Result<Model, Error> {
    debug!("New user to be inserted: {nickname}");

    let now = Utc::now();
    let user_active_model = ActiveModel {
        uuid: Set(Uuid::new_v4()),
        nickname: Set(nickname.to_string()),
        password: Set(generate_hash(password)),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(user_active_model.insert(db).await?)
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| Error::new(EntityApiErrorKind::RecordNotFound))
}

pub async fn find_by_uuid(db: &impl ConnectionTrait, uuid: PublicId) -> Result<Model, Error> {
    Entity::find()
        .filter(Column::Uuid.eq(uuid))
        .one(db)
        .await?
        .ok_or_else(|| Error::new(EntityApiErrorKind::RecordNotFound))
}

pub async fn find_by_nickname(
    db: &impl ConnectionTrait,
    nickname: &str,
) -> Result<Option<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::Nickname.eq(nickname))
        .one(db)
        .await?)
}

/// Looks up `nickname` and checks `password` against the stored hash.
pub async fn authenticate(
    db: &impl ConnectionTrait,
    nickname: &str,
    password: &str,
) -> Result<Model, Error> {
    let user = find_by_nickname(db, nickname)
        .await?
        .ok_or_else(|| Error::new(EntityApiErrorKind::RecordNotFound))?;

    verify_password(password, &user.password)?;
    Ok(user)
}

pub fn verify_password(password_to_verify: &str, password_hash: &str) -> Result<(), Error> {
    password_auth::verify_password(password_to_verify, password_hash)
        .map_err(|_| Error::new(EntityApiErrorKind::RecordUnauthenticated))
}

pub fn generate_hash(password: &str) -> String {
    password_auth::generate_hash(password)
}


#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod mock_test {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn user(nickname: &str, password: &str) -> Model {
        let now = Utc::now();
        Model {
            id: 1,
            uuid: Uuid::new_v4(),
            nickname: nickname.to_string(),
            password: generate_hash(password),
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn create_returns_the_inserted_user() -> Result<(), Error> {
        let inserted = user("alice", "secret");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![inserted.clone()]])
            .into_connection();

        let created = create(&db, "alice", "secret").await?;

        assert_eq!(created, inserted);
        Ok(())
    }

    #[tokio::test]
    async fn find_by_uuid_returns_not_found_for_unknown_user() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<Model>::new()])
            .into_connection();

        let err = find_by_uuid(&db, Uuid::new_v4()).await.unwrap_err();

        assert_eq!(err.error_kind, EntityApiErrorKind::RecordNotFound);
    }

    #[tokio::test]
    async fn authenticate_accepts_matching_credentials() -> Result<(), Error> {
        let stored = user("alice", "secret");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored.clone()]])
            .into_connection();

        let authenticated = authenticate(&db, "alice", "secret").await?;

        assert_eq!(authenticated, stored);
        Ok(())
    }

    #[tokio::test]
    async fn authenticate_rejects_wrong_password() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user("alice", "secret")]])
            .into_connection();

        let err = authenticate(&db, "alice", "guess").await.unwrap_err();

        assert_eq!(err.error_kind, EntityApiErrorKind::RecordUnauthenticated);
    }

    #[tokio::test]
    async fn authenticate_reports_unknown_nickname_as_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<Model>::new()])
            .into_connection();

        let err = authenticate(&db, "nobody", "secret").await.unwrap_err();

        assert_eq!(err.error_kind, EntityApiErrorKind::RecordNotFound);
    }
}
