//! Domain layer - Core business logic and entities

pub mod account;
pub mod error;

pub use account::{
    Account, AccountChanges, AccountField, AccountId, AccountStore, AccountValidator,
    CredentialError, CredentialHasher, EntityValidator, LifecycleController, LifecycleError,
    LifecycleEvent, ValidationError,
};
pub use error::DomainError;
