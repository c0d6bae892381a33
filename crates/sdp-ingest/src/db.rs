//! Database connection pool

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::tickets::{IngestError, Result};

/// Open a connection pool to the destination database.
///
/// Connects eagerly so an unreachable host or rejected credentials fail the
/// run immediately rather than on first use. No retry; the caller aborts.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .connect(&config.url())
        .await
        .map_err(IngestError::Connection)?;

    info!(
        host = %config.host,
        database = %config.database,
        "Connected to PostgreSQL"
    );

    Ok(pool)
}
