use crate::domain::message::{Message, MessageResponse};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use time::OffsetDateTime;

/// Maximum message content length. Measured in bytes, not Unicode scalar
/// values, matching how the storage layer counts.
pub const MAX_CONTENT_BYTES: usize = 280;

/// Limit substituted when a list request carries no usable limit.
pub const DEFAULT_LIST_LIMIT: i64 = 100;

/// Port to the message store. The concrete implementation lives in
/// `adapters::database`; tests run the service against an in-memory fake.
#[async_trait]
pub trait MessageStore: Send + Sync + fmt::Debug {
    /// Inserts a new row and writes the assigned id back into the entity.
    async fn create(&self, message: &mut Message) -> Result<()>;

    /// Returns up to `limit` non-deleted messages, newest id first. The
    /// store does not clamp the limit; defaulting is the service's job.
    async fn get_all(&self, limit: i64) -> Result<Vec<Message>>;

    /// Returns the non-deleted message with the given id.
    ///
    /// # Errors
    /// Returns `AppError::NotFound` if no such row exists or it is
    /// soft-deleted.
    async fn get_by_id(&self, id: i64) -> Result<Message>;

    /// Persists the current state of an existing message.
    async fn update(&self, message: &Message) -> Result<()>;

    /// Soft-deletes the row with the given id. Deleting an absent id is a
    /// no-op success.
    async fn delete(&self, id: i64) -> Result<()>;
}

#[derive(Clone, Debug)]
pub struct MessageService {
    store: Arc<dyn MessageStore>,
}

impl MessageService {
    #[must_use]
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store }
    }

    /// Validates and persists a new message.
    ///
    /// # Errors
    /// Returns `AppError::Validation` if the content is empty or too long.
    /// Returns `AppError::Database` if the insert fails.
    #[tracing::instrument(err(level = "warn"), skip(self, content))]
    pub async fn create_message(&self, content: &str) -> Result<MessageResponse> {
        validate_content(content)?;

        let mut message = Message::new(content.to_string());
        self.store.create(&mut message).await?;

        tracing::debug!(id = message.id, "Message created");
        Ok(MessageResponse::from(&message))
    }

    /// Lists messages, newest first. A missing or non-positive limit falls
    /// back to [`DEFAULT_LIST_LIMIT`].
    ///
    /// # Errors
    /// Returns `AppError::Database` if the query fails.
    #[tracing::instrument(err(level = "warn"), skip(self))]
    pub async fn get_all_messages(&self, limit: Option<i64>) -> Result<Vec<MessageResponse>> {
        let limit = limit.filter(|l| *l > 0).unwrap_or(DEFAULT_LIST_LIMIT);

        let messages = self.store.get_all(limit).await?;
        Ok(messages.iter().map(MessageResponse::from).collect())
    }

    /// Fetches a single message by id.
    ///
    /// # Errors
    /// Returns `AppError::NotFound` if the message does not exist or is
    /// deleted.
    #[tracing::instrument(err(level = "debug"), skip(self))]
    pub async fn get_message_by_id(&self, id: i64) -> Result<MessageResponse> {
        let message = self.store.get_by_id(id).await?;
        Ok(MessageResponse::from(&message))
    }

    /// Replaces the content of an existing message and refreshes its update
    /// timestamp. Validation happens before storage is touched.
    ///
    /// # Errors
    /// Returns `AppError::Validation` if the content is invalid.
    /// Returns `AppError::NotFound` if the message does not exist.
    #[tracing::instrument(err(level = "warn"), skip(self, content))]
    pub async fn update_message(&self, id: i64, content: &str) -> Result<MessageResponse> {
        validate_content(content)?;

        let mut message = self.store.get_by_id(id).await?;
        message.content = content.to_string();
        message.updated_at = OffsetDateTime::now_utc();

        self.store.update(&message).await?;

        tracing::debug!(id = message.id, "Message updated");
        Ok(MessageResponse::from(&message))
    }

    /// Soft-deletes a message. Deleting an id that never existed is treated
    /// as success.
    ///
    /// # Errors
    /// Returns `AppError::Database` if the deletion fails.
    #[tracing::instrument(err(level = "warn"), skip(self))]
    pub async fn delete_message(&self, id: i64) -> Result<()> {
        self.store.delete(id).await
    }
}

fn validate_content(content: &str) -> Result<()> {
    if content.is_empty() {
        return Err(AppError::Validation("message content cannot be empty".to_string()));
    }
    if content.len() > MAX_CONTENT_BYTES {
        return Err(AppError::Validation("message content cannot exceed 280 characters".to_string()));
    }
    Ok(())
}
