use serde::Deserialize;

use crate::domain::DomainError;
use crate::infrastructure::account::Argon2Cost;

/// Variable name the hashing secret is read from when not set under `APP__`
pub const LEGACY_SECRET_VAR: &str = "ARGON2_SECRET";

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Credential hashing settings
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub argon2_secret: Option<String>,
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("argon2_secret", &self.argon2_secret.as_ref().map(|_| "<redacted>"))
            .field("memory_kib", &self.memory_kib)
            .field("iterations", &self.iterations)
            .field("parallelism", &self.parallelism)
            .finish()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        let cost = Argon2Cost::default();

        Self {
            argon2_secret: None,
            memory_kib: cost.memory_kib,
            iterations: cost.iterations,
            parallelism: cost.parallelism,
        }
    }
}

impl SecurityConfig {
    /// The hashing secret; a missing or blank value is fatal at startup
    pub fn secret(&self) -> Result<&str, DomainError> {
        match self.argon2_secret.as_deref() {
            Some(secret) if !secret.trim().is_empty() => Ok(secret),
            _ => Err(DomainError::configuration(format!(
                "hashing secret is not set (APP__SECURITY__ARGON2_SECRET or {})",
                LEGACY_SECRET_VAR
            ))),
        }
    }

    pub fn cost(&self) -> Argon2Cost {
        Argon2Cost {
            memory_kib: self.memory_kib,
            iterations: self.iterations,
            parallelism: self.parallelism,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        if let Ok(secret) = std::env::var(LEGACY_SECRET_VAR) {
            builder = builder.set_default("security.argon2_secret", secret)?;
        }

        let config = builder
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
