//! Password hashing using Argon2 with an application-wide secret

use std::sync::Arc;

use argon2::{
    password_hash::{
        self, rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};
use async_trait::async_trait;
use tracing::warn;

use crate::domain::account::{CredentialError, CredentialHasher};

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Cost {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for Argon2Cost {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

/// Argon2id hasher producing PHC strings.
///
/// The secret is passed to Argon2 as its keyed input, so credentials only
/// verify with the same secret they were hashed with. Hashing runs on the
/// blocking thread pool.
#[derive(Clone)]
pub struct Argon2Hasher {
    secret: Arc<[u8]>,
    params: Params,
}

impl Argon2Hasher {
    /// Create a hasher with the default cost parameters
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self, CredentialError> {
        Self::with_cost(secret, Argon2Cost::default())
    }

    /// Create a hasher with explicit cost parameters
    pub fn with_cost(secret: impl Into<Vec<u8>>, cost: Argon2Cost) -> Result<Self, CredentialError> {
        let secret: Vec<u8> = secret.into();
        if secret.is_empty() {
            return Err(CredentialError::InvalidConfiguration(
                "hashing secret cannot be empty".to_string(),
            ));
        }

        let params = Params::new(cost.memory_kib, cost.iterations, cost.parallelism, None)
            .map_err(|e| CredentialError::InvalidConfiguration(e.to_string()))?;

        // Reject secrets Argon2 would refuse before the first hash does
        build_argon2(&secret, params.clone())
            .map_err(|e| CredentialError::InvalidConfiguration(e.to_string()))?;

        Ok(Self {
            secret: secret.into(),
            params,
        })
    }
}

impl std::fmt::Debug for Argon2Hasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Argon2Hasher")
            .field("secret", &"<redacted>")
            .field("params", &self.params)
            .finish()
    }
}

fn build_argon2(secret: &[u8], params: Params) -> Result<Argon2<'_>, CredentialError> {
    Argon2::new_with_secret(secret, Algorithm::Argon2id, Version::V0x13, params)
        .map_err(|e| CredentialError::derivation(e.to_string()))
}

#[async_trait]
impl CredentialHasher for Argon2Hasher {
    async fn hash(&self, plaintext: &str) -> Result<String, CredentialError> {
        let secret = Arc::clone(&self.secret);
        let params = self.params.clone();
        let plaintext = plaintext.to_owned();

        tokio::task::spawn_blocking(move || {
            let argon2 = build_argon2(&secret, params)?;
            let salt = SaltString::generate(&mut OsRng);

            argon2
                .hash_password(plaintext.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| CredentialError::derivation(format!("Failed to hash password: {}", e)))
        })
        .await
        .map_err(|e| CredentialError::derivation(format!("Hashing task failed: {}", e)))?
    }

    async fn verify(&self, plaintext: &str, credential: &str) -> bool {
        let secret = Arc::clone(&self.secret);
        let params = self.params.clone();
        let plaintext = plaintext.to_owned();
        let credential = credential.to_owned();

        let outcome = tokio::task::spawn_blocking(move || -> Result<bool, String> {
            let parsed = PasswordHash::new(&credential)
                .map_err(|e| format!("unreadable credential: {}", e))?;
            let argon2 = build_argon2(&secret, params).map_err(|e| e.to_string())?;

            match argon2.verify_password(plaintext.as_bytes(), &parsed) {
                Ok(()) => Ok(true),
                Err(password_hash::Error::Password) => Ok(false),
                Err(e) => Err(e.to_string()),
            }
        })
        .await;

        match outcome {
            Ok(Ok(matched)) => matched,
            Ok(Err(reason)) => {
                warn!(%reason, "Credential verification fault, treating as mismatch");
                false
            }
            Err(e) => {
                warn!(error = %e, "Credential verification task failed, treating as mismatch");
                false
            }
        }
    }
}
