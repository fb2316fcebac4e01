use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A board message. The id is assigned by the database on insert and is
/// immutable afterwards; `deleted_at` marks the row as soft-deleted.
#[derive(Debug, Clone)]
pub struct Message {
    pub id: i64,
    pub content: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub deleted_at: Option<OffsetDateTime>,
}

impl Message {
    /// Builds a new, not yet persisted message stamped with the current time.
    #[must_use]
    pub fn new(content: String) -> Self {
        let now = OffsetDateTime::now_utc();
        Self { id: 0, content, created_at: now, updated_at: now, deleted_at: None }
    }

    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Transport-facing view of a message. Update and deletion timestamps are
/// withheld from clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: i64,
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<&Message> for MessageResponse {
    fn from(message: &Message) -> Self {
        Self { id: message.id, content: message.content.clone(), created_at: message.created_at }
    }
}
