//! Connection pool wrapper.

use crate::error::DbError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

/// Default maximum number of pooled connections.
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Default connection acquire timeout.
const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// A PostgreSQL connection pool.
///
/// Thin wrapper around [`sqlx::PgPool`] with crewdeck defaults.
#[derive(Debug, Clone)]
pub struct DbPool {
    inner: PgPool,
}

impl DbPool {
    /// Connect to the database with default pool settings.
    pub async fn connect(database_url: &str) -> Result<Self, DbError> {
        Self::connect_with_options(database_url, DEFAULT_MAX_CONNECTIONS).await
    }

    /// Connect with an explicit maximum connection count.
    pub async fn connect_with_options(
        database_url: &str,
        max_connections: u32,
    ) -> Result<Self, DbError> {
        let inner = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(DEFAULT_ACQUIRE_TIMEOUT)
            .connect(database_url)
            .await
            .map_err(DbError::ConnectionFailed)?;

        tracing::debug!(max_connections, "Database pool created");

        Ok(Self { inner })
    }

    /// Access the underlying sqlx pool.
    #[must_use]
    pub fn inner(&self) -> &PgPool {
        &self.inner
    }
}

impl From<PgPool> for DbPool {
    fn from(inner: PgPool) -> Self {
        Self { inner }
    }
}
