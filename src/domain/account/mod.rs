//! Account domain
//!
//! This module provides the account entity, its field validation rules,
//! the credential hashing port and the lifecycle hooks a store runs before
//! every write.

mod credential;
mod entity;
mod lifecycle;
mod repository;
mod validation;

pub use credential::{CredentialError, CredentialHasher};
pub use entity::{Account, AccountChanges, AccountField, AccountId};
pub use lifecycle::{LifecycleController, LifecycleError, LifecycleEvent};
pub use repository::AccountStore;
pub use validation::{
    is_strong_password, is_valid_email, is_valid_username, AccountValidator, EntityValidator,
    ValidationError, INCORRECT_EMAIL, INCORRECT_USERNAME, WEAK_PASSWORD,
};

#[cfg(test)]
pub use credential::MockCredentialHasher;
