use crate::config::DatabaseConfig;
use backon::{BackoffBuilder, Retryable};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::time::Duration;

pub mod message_repo;
pub mod records;

pub use message_repo::PgMessageRepository;

pub type DbPool = Pool<Postgres>;

/// Total connection attempts made before startup gives up.
const CONNECT_ATTEMPTS: u32 = 15;
const CONNECT_BACKOFF_UNIT: Duration = Duration::from_secs(1);

/// Linearly growing backoff: the i-th retry waits `delay * i`.
///
/// `backon` ships constant, exponential and fibonacci strategies but no
/// linear one, so the builder is implemented here.
#[derive(Clone, Copy, Debug)]
pub struct LinearBuilder {
    delay: Duration,
    max_times: u32,
}

impl LinearBuilder {
    #[must_use]
    pub const fn new(delay: Duration, max_times: u32) -> Self {
        Self { delay, max_times }
    }
}

#[derive(Clone, Debug)]
pub struct LinearBackoff {
    delay: Duration,
    attempts: u32,
    max_times: u32,
}

impl BackoffBuilder for LinearBuilder {
    type Backoff = LinearBackoff;

    fn build(self) -> Self::Backoff {
        LinearBackoff { delay: self.delay, attempts: 0, max_times: self.max_times }
    }
}

impl Iterator for LinearBackoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        if self.attempts >= self.max_times {
            return None;
        }
        self.attempts += 1;
        Some(self.delay * self.attempts)
    }
}

/// Initializes the database connection pool, retrying with linear backoff
/// until the database accepts a connection or the attempt bound is hit.
///
/// # Errors
/// Returns the last `sqlx::Error` once all attempts are exhausted. Callers
/// must treat this as fatal at startup.
pub async fn init_pool(config: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
    let url = config.connect_url();

    // max_times counts retries, so 14 retries after the initial attempt.
    let backoff = LinearBuilder::new(CONNECT_BACKOFF_UNIT, CONNECT_ATTEMPTS - 1);

    let pool = (|| async {
        PgPoolOptions::new().max_connections(config.max_connections).connect(&url).await
    })
    .retry(backoff)
    .notify(|e: &sqlx::Error, duration: Duration| {
        tracing::warn!(error = %e, retry_in = ?duration, "Database connection failed, retrying");
    })
    .await?;

    tracing::info!(host = %config.db_host, database = %config.db_name, "Database connected");
    Ok(pool)
}

/// Creates the messages table and its indexes if they do not exist yet.
/// Safe to run on every startup.
///
/// # Errors
/// Returns `sqlx::Error` if the DDL fails.
pub async fn ensure_schema(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS messages (
            id         BIGSERIAL PRIMARY KEY,
            content    TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL,
            deleted_at TIMESTAMPTZ
        )
        ",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_messages_deleted_at ON messages (deleted_at)")
        .execute(pool)
        .await?;

    Ok(())
}
