#![allow(dead_code, clippy::unwrap_used, clippy::panic, clippy::missing_panics_doc, clippy::must_use_candidate, missing_debug_implementations, unreachable_pub)]

use async_trait::async_trait;
use axum::Router;
use bulletin_server::api::{self, AppState};
use bulletin_server::domain::message::Message;
use bulletin_server::error::{AppError, Result};
use bulletin_server::services::message_service::{MessageService, MessageStore};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Once};
use time::OffsetDateTime;

static INIT: Once = Once::new();

pub fn setup_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "warn".into())
            .add_directive("bulletin_server=debug".parse().unwrap())
            .add_directive("tower=warn".parse().unwrap());

        tracing_subscriber::fmt().with_env_filter(filter).init();
    });
}

#[derive(Debug, Default)]
struct StoreState {
    next_id: i64,
    rows: Vec<Message>,
}

/// In-memory stand-in for the Postgres repository. Mirrors the soft-delete
/// contract: deleted rows stay in `rows` but are invisible to reads.
#[derive(Debug, Default)]
pub struct InMemoryMessageStore {
    state: Mutex<StoreState>,
    fail: AtomicBool,
}

impl InMemoryMessageStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Makes every subsequent store operation fail with a database error.
    pub fn fail_all(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Number of physical rows, deleted ones included.
    pub fn row_count(&self) -> usize {
        self.state.lock().unwrap().rows.len()
    }

    /// Raw row access, bypassing soft-delete filtering.
    pub fn get_raw(&self, id: i64) -> Option<Message> {
        self.state.lock().unwrap().rows.iter().find(|m| m.id == id).cloned()
    }

    fn check_fail(&self) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolClosed));
        }
        Ok(())
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn create(&self, message: &mut Message) -> Result<()> {
        self.check_fail()?;
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        message.id = state.next_id;
        state.rows.push(message.clone());
        Ok(())
    }

    async fn get_all(&self, limit: i64) -> Result<Vec<Message>> {
        self.check_fail()?;
        let state = self.state.lock().unwrap();
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(state.rows.iter().rev().filter(|m| !m.is_deleted()).take(limit).cloned().collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<Message> {
        self.check_fail()?;
        let state = self.state.lock().unwrap();
        state.rows.iter().find(|m| m.id == id && !m.is_deleted()).cloned().ok_or(AppError::NotFound)
    }

    async fn update(&self, message: &Message) -> Result<()> {
        self.check_fail()?;
        let mut state = self.state.lock().unwrap();
        if let Some(row) = state.rows.iter_mut().find(|m| m.id == message.id) {
            *row = message.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.check_fail()?;
        let mut state = self.state.lock().unwrap();
        if let Some(row) = state.rows.iter_mut().find(|m| m.id == id && !m.is_deleted()) {
            row.deleted_at = Some(OffsetDateTime::now_utc());
        }
        Ok(())
    }
}

pub fn message_service(store: Arc<InMemoryMessageStore>) -> MessageService {
    setup_tracing();
    MessageService::new(store)
}

pub fn message_router(store: Arc<InMemoryMessageStore>) -> Router {
    setup_tracing();
    let state = AppState {
        message_service: MessageService::new(store),
        metrics: api::messages::Metrics::new(),
    };
    api::message_routes(state)
}
