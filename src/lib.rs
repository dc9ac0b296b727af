//! Account Service
//!
//! User registration, phone/password login, RSA-signed access tokens and
//! owner-only profile reads and updates over HTTP.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

#[cfg(test)]
mod test_support;

pub use config::AppConfig;

use std::sync::Arc;

use anyhow::Context;
use api::state::AppState;
use config::StorageBackend;
use infrastructure::auth::{load_key_pair, JwtTokenService, TokenService};
use infrastructure::storage::{connect_pool, run_migrations};
use infrastructure::user::{InMemoryUserRepository, PostgresUserRepository};
use tracing::{info, warn};

/// Create the application state with custom configuration
///
/// Loads the signing keys, then wires the configured user repository into
/// the user and auth services.
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let tokens = create_token_service(config)?;

    match config.storage.backend {
        StorageBackend::Memory => {
            warn!("Using in-memory user storage; accounts are lost on restart");
            Ok(AppState::from_parts(
                Arc::new(InMemoryUserRepository::new()),
                tokens,
            ))
        }
        StorageBackend::Postgres => {
            let pool = connect_pool(&config.storage).await?;

            if config.storage.run_migrations {
                let applied = run_migrations(&pool).await?;
                info!(applied, "Database migrations complete");
            }

            info!("Using PostgreSQL user storage");
            Ok(AppState::from_parts(
                Arc::new(PostgresUserRepository::new(pool)),
                tokens,
            ))
        }
    }
}

fn create_token_service(config: &AppConfig) -> anyhow::Result<Arc<dyn TokenService>> {
    let auth = &config.auth;

    let pair = load_key_pair(&auth.private_key_path, &auth.public_key_path)
        .context("Failed to load token signing keys (run `account-service keygen` to create them)")?;
    let service = JwtTokenService::from_key_pair(&pair, auth.token_lifetime())?;

    info!(
        private_key = %auth.private_key_path.display(),
        lifetime_secs = auth.token_lifetime_secs,
        "Token signing keys loaded"
    );

    Ok(Arc::new(service))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::auth::write_key_pair;
    use crate::test_support::key_pair;

    fn config_with_keys(dir: &std::path::Path) -> AppConfig {
        let (private_path, public_path) = write_key_pair(key_pair(), dir, false).unwrap();

        let mut config = AppConfig::default();
        config.auth.private_key_path = private_path;
        config.auth.public_key_path = public_path;
        config
    }

    #[tokio::test]
    async fn test_memory_backend_state() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_keys(dir.path());

        assert!(create_app_state_with_config(&config).await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_keys_fail_startup() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.auth.private_key_path = dir.path().join("missing");
        config.auth.public_key_path = dir.path().join("missing.pub");

        assert!(create_app_state_with_config(&config).await.is_err());
    }

    #[tokio::test]
    async fn test_zero_lifetime_fails_startup() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_with_keys(dir.path());
        config.auth.token_lifetime_secs = 0;

        assert!(create_app_state_with_config(&config).await.is_err());
    }

    #[tokio::test]
    async fn test_postgres_backend_requires_url() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_with_keys(dir.path());
        config.storage.backend = StorageBackend::Postgres;
        config.storage.database_url = None;

        assert!(create_app_state_with_config(&config).await.is_err());
    }
}
