//! Account store trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{Account, AccountChanges, AccountId};
use crate::domain::DomainError;

/// Storage collaborator for accounts.
///
/// Implementations must run the lifecycle hooks before committing an insert
/// or update and must not write anything when a hook fails.
#[async_trait]
pub trait AccountStore: Send + Sync + Debug {
    /// Get an account by its ID
    async fn get(&self, id: AccountId) -> Result<Option<Account>, DomainError>;

    /// Get an account by its username
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, DomainError>;

    /// Get an account by its email
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError>;

    /// List all accounts ordered by ID
    async fn list(&self) -> Result<Vec<Account>, DomainError>;

    /// Persist a new account; the stored copy is returned
    async fn insert(&self, account: Account) -> Result<Account, DomainError>;

    /// Apply changes to an existing account; the stored copy is returned
    async fn update(&self, id: AccountId, changes: AccountChanges) -> Result<Account, DomainError>;

    /// Remove an account, returning it if it existed
    async fn remove(&self, id: AccountId) -> Result<Option<Account>, DomainError>;
}
