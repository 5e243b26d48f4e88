//! Application state for shared services

use std::sync::Arc;

use crate::domain::account::{Account, AccountChanges, AccountId, AccountStore, CredentialHasher};
use crate::domain::DomainError;
use crate::infrastructure::account::{AccountService, CreateAccountRequest};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub account_service: Arc<dyn AccountServiceTrait>,
}

impl AppState {
    pub fn new(account_service: Arc<dyn AccountServiceTrait>) -> Self {
        Self { account_service }
    }
}

/// Trait for account service operations
#[async_trait::async_trait]
pub trait AccountServiceTrait: Send + Sync {
    async fn create(&self, request: CreateAccountRequest) -> Result<Account, DomainError>;
    async fn update(&self, id: AccountId, changes: AccountChanges)
        -> Result<Account, DomainError>;
    async fn get(&self, id: AccountId) -> Result<Option<Account>, DomainError>;
    async fn remove(&self, id: AccountId) -> Result<bool, DomainError>;
}

#[async_trait::async_trait]
impl<S, H> AccountServiceTrait for AccountService<S, H>
where
    S: AccountStore + 'static,
    H: CredentialHasher + 'static,
{
    async fn create(&self, request: CreateAccountRequest) -> Result<Account, DomainError> {
        AccountService::create(self, request).await
    }

    async fn update(
        &self,
        id: AccountId,
        changes: AccountChanges,
    ) -> Result<Account, DomainError> {
        AccountService::update(self, id, changes).await
    }

    async fn get(&self, id: AccountId) -> Result<Option<Account>, DomainError> {
        AccountService::get(self, id).await
    }

    async fn remove(&self, id: AccountId) -> Result<bool, DomainError> {
        AccountService::remove(self, id).await
    }
}
