//! Account Lifecycle
//!
//! A user-account record manager:
//! - Field validation for username, email and password
//! - Argon2 credential derivation with an application-wide secret
//! - Lifecycle hooks that gate every insert and update of a record
//! - An in-memory store and a small HTTP API on top

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use tracing::info;

use api::state::AppState;
use domain::{DomainError, LifecycleController};
use infrastructure::account::{AccountService, Argon2Hasher, InMemoryAccountStore};

/// Wire the hasher, lifecycle hooks, store and service from configuration
pub fn create_app_state(config: &AppConfig) -> Result<AppState, DomainError> {
    let secret = config.security.secret()?;
    let hasher = Argon2Hasher::with_cost(secret.as_bytes(), config.security.cost())
        .map_err(|e| DomainError::configuration(e.to_string()))?;
    let hasher = Arc::new(hasher);

    let lifecycle = Arc::new(LifecycleController::new(Arc::clone(&hasher)));
    let store = Arc::new(InMemoryAccountStore::new(lifecycle));
    let service = AccountService::new(store, hasher);

    info!("Account service initialized with in-memory storage");
    Ok(AppState::new(Arc::new(service)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SecurityConfig;

    #[test]
    fn test_create_app_state_requires_secret() {
        let config = AppConfig::default();

        let result = create_app_state(&config);
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_create_app_state_rejects_invalid_cost() {
        let config = AppConfig {
            security: SecurityConfig {
                argon2_secret: Some("pepper".to_string()),
                iterations: 0,
                ..SecurityConfig::default()
            },
            ..AppConfig::default()
        };

        let result = create_app_state(&config);
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_create_app_state() {
        let config = AppConfig {
            security: SecurityConfig {
                argon2_secret: Some("pepper".to_string()),
                ..SecurityConfig::default()
            },
            ..AppConfig::default()
        };

        assert!(create_app_state(&config).is_ok());
    }
}
