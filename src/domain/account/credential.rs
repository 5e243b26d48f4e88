//! Credential derivation port

use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

/// Errors raised while deriving a credential
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Credential derivation failed: {0}")]
    Derivation(String),

    #[error("Invalid hasher configuration: {0}")]
    InvalidConfiguration(String),
}

impl CredentialError {
    pub fn derivation(message: impl Into<String>) -> Self {
        Self::Derivation(message.into())
    }
}

/// One-way credential derivation with an application-wide secret mixed in.
///
/// `hash` must be salted so two calls on the same plaintext differ.
/// `verify` never fails: any fault while comparing is reported as a mismatch.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CredentialHasher: Send + Sync + Debug {
    /// Derive a credential from a plaintext secret
    async fn hash(&self, plaintext: &str) -> Result<String, CredentialError>;

    /// Check a plaintext against a credential previously produced by `hash`
    async fn verify(&self, plaintext: &str, credential: &str) -> bool;
}
