use log::info;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        info!("Creating users, sessions and messages tables");

        db.execute_unprepared(
            "CREATE TABLE IF NOT EXISTS courier.users (
                id SERIAL PRIMARY KEY,
                uuid UUID NOT NULL UNIQUE,
                nickname TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )",
        )
        .await?;

        db.execute_unprepared(
            "CREATE TABLE IF NOT EXISTS courier.sessions (
                id SERIAL PRIMARY KEY,
                session_key TEXT NOT NULL UNIQUE,
                user_id INTEGER NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                CONSTRAINT fk_sessions_user
                    FOREIGN KEY (user_id)
                    REFERENCES courier.users(id)
                    ON DELETE CASCADE
                    ON UPDATE CASCADE
            )",
        )
        .await?;

        db.execute_unprepared(
            "CREATE TABLE IF NOT EXISTS courier.messages (
                id SERIAL PRIMARY KEY,
                uuid UUID NOT NULL UNIQUE,
                sender_id INTEGER NOT NULL,
                receiver_id INTEGER NOT NULL,
                text TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                deleted_at TIMESTAMPTZ,
                CONSTRAINT fk_messages_sender
                    FOREIGN KEY (sender_id)
                    REFERENCES courier.users(id)
                    ON DELETE CASCADE
                    ON UPDATE CASCADE,
                CONSTRAINT fk_messages_receiver
                    FOREIGN KEY (receiver_id)
                    REFERENCES courier.users(id)
                    ON DELETE CASCADE
                    ON UPDATE CASCADE
            )",
        )
        .await?;

        // Conversation history reads filter on the pair and order by time
        db.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS messages_conversation_idx
            ON courier.messages(receiver_id, sender_id, created_at)",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared("DROP TABLE IF EXISTS courier.messages")
            .await?;
        db.execute_unprepared("DROP TABLE IF EXISTS courier.sessions")
            .await?;
        db.execute_unprepared("DROP TABLE IF EXISTS courier.users")
            .await?;

        Ok(())
    }
}
