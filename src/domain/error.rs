use thiserror::Error;

use super::account::LifecycleError;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// A lifecycle hook rejected the pending write
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Whether the caller can fix this by resubmitting different data
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::NotFound { .. } | Self::Conflict { .. } => true,
            Self::Lifecycle(err) => err.is_validation(),
            Self::Configuration { .. } => false,
        }
    }
}
