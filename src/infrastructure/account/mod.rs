//! Account infrastructure module
//!
//! This module provides implementations for account storage and credentials,
//! including password hashing with Argon2, an in-memory store and the
//! account service.

mod password;
mod repository;
mod service;

pub use password::{Argon2Cost, Argon2Hasher};
pub use repository::InMemoryAccountStore;
pub use service::{AccountService, CreateAccountRequest};
