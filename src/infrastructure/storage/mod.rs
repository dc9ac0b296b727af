//! PostgreSQL connection pool and schema migrations

pub mod migrations;

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::StorageConfig;
use crate::domain::DomainError;

pub use migrations::{run_migrations, user_migrations, Migration, PostgresMigrator};

/// Open a pool for the configured database URL
pub async fn connect_pool(config: &StorageConfig) -> Result<PgPool, DomainError> {
    let url = config
        .database_url
        .as_deref()
        .ok_or_else(|| DomainError::configuration("storage.database_url is required for postgres"))?;

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .connect(url)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))
}
