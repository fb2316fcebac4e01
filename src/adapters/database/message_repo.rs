use crate::adapters::database::DbPool;
use crate::adapters::database::records::MessageRecord;
use crate::domain::message::Message;
use crate::error::{AppError, Result};
use crate::services::message_service::MessageStore;
use async_trait::async_trait;

/// Postgres-backed implementation of [`MessageStore`]. Soft-deleted rows are
/// invisible to reads; deletion only stamps `deleted_at`.
#[derive(Clone, Debug)]
pub struct PgMessageRepository {
    pool: DbPool,
}

impl PgMessageRepository {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageStore for PgMessageRepository {
    #[tracing::instrument(level = "debug", skip(self, message))]
    async fn create(&self, message: &mut Message) -> Result<()> {
        let id: i64 = sqlx::query_scalar(
            r"
            INSERT INTO messages (content, created_at, updated_at)
            VALUES ($1, $2, $3)
            RETURNING id
            ",
        )
        .bind(&message.content)
        .bind(message.created_at)
        .bind(message.updated_at)
        .fetch_one(&self.pool)
        .await?;

        message.id = id;
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn get_all(&self, limit: i64) -> Result<Vec<Message>> {
        let records = sqlx::query_as::<_, MessageRecord>(
            r"
            SELECT id, content, created_at, updated_at, deleted_at
            FROM messages
            WHERE deleted_at IS NULL
            ORDER BY id DESC
            LIMIT $1
            ",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn get_by_id(&self, id: i64) -> Result<Message> {
        let record = sqlx::query_as::<_, MessageRecord>(
            r"
            SELECT id, content, created_at, updated_at, deleted_at
            FROM messages
            WHERE id = $1 AND deleted_at IS NULL
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        record.map(Into::into).ok_or(AppError::NotFound)
    }

    #[tracing::instrument(level = "debug", skip(self, message))]
    async fn update(&self, message: &Message) -> Result<()> {
        sqlx::query(
            r"
            UPDATE messages
            SET content = $2, updated_at = $3
            WHERE id = $1
            ",
        )
        .bind(message.id)
        .bind(&message.content)
        .bind(message.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query(
            r"
            UPDATE messages
            SET deleted_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            ",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        // Deleting an absent or already-deleted id is an idempotent no-op.
        if result.rows_affected() == 0 {
            tracing::debug!(id, "Delete matched no rows");
        }

        Ok(())
    }
}
