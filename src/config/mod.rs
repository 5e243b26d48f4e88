//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, LogFormat, LoggingConfig, SecurityConfig, ServerConfig, LEGACY_SECRET_VAR,
};
