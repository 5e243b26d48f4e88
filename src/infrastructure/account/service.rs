//! Account service for registration, updates and credential checks

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::account::{Account, AccountChanges, AccountId, AccountStore, CredentialHasher};
use crate::domain::DomainError;

/// Request for creating a new account
#[derive(Debug, Clone)]
pub struct CreateAccountRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Account service on top of a store and a hasher.
///
/// Validation and hashing of writes happen inside the store's lifecycle
/// hooks; the service only needs the hasher to check credentials.
#[derive(Debug)]
pub struct AccountService<S: AccountStore, H: CredentialHasher> {
    store: Arc<S>,
    hasher: Arc<H>,
}

impl<S: AccountStore, H: CredentialHasher> AccountService<S, H> {
    pub fn new(store: Arc<S>, hasher: Arc<H>) -> Self {
        Self { store, hasher }
    }

    /// Create a new account
    pub async fn create(&self, request: CreateAccountRequest) -> Result<Account, DomainError> {
        let account = Account::new(request.username, request.email, request.password);
        let stored = self.store.insert(account).await?;

        info!(account_id = ?stored.id(), "Account created");
        Ok(stored)
    }

    /// Apply a partial update to an account
    pub async fn update(
        &self,
        id: AccountId,
        changes: AccountChanges,
    ) -> Result<Account, DomainError> {
        self.store.update(id, changes).await
    }

    pub async fn get(&self, id: AccountId) -> Result<Option<Account>, DomainError> {
        self.store.get(id).await
    }

    /// Remove an account, returning whether it existed
    pub async fn remove(&self, id: AccountId) -> Result<bool, DomainError> {
        Ok(self.store.remove(id).await?.is_some())
    }

    /// Find the account matching a username and plaintext password
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<Account>, DomainError> {
        let account = match self.store.find_by_username(username).await? {
            Some(a) => a,
            None => return Ok(None),
        };

        if !self.hasher.verify(password, account.password()).await {
            debug!(account_id = ?account.id(), "Password mismatch");
            return Ok(None);
        }

        Ok(Some(account))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::LifecycleController;
    use crate::infrastructure::account::{Argon2Cost, Argon2Hasher, InMemoryAccountStore};

    const PASSWORD: &str = "cGW&%Rnjjq3E4KJ9";

    type TestService = AccountService<InMemoryAccountStore<Argon2Hasher>, Argon2Hasher>;

    fn service() -> TestService {
        let cost = Argon2Cost {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        };
        let hasher = Arc::new(Argon2Hasher::with_cost("service-secret", cost).unwrap());
        let lifecycle = Arc::new(LifecycleController::new(Arc::clone(&hasher)));
        let store = Arc::new(InMemoryAccountStore::new(lifecycle));
        AccountService::new(store, hasher)
    }

    fn request(username: &str, email: &str, password: &str) -> CreateAccountRequest {
        CreateAccountRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_stores_credential_not_plaintext() {
        let service = service();

        let account = service
            .create(request("Username", "user@example.com", PASSWORD))
            .await
            .unwrap();

        assert!(account.id().is_some());
        assert_ne!(account.password(), PASSWORD);
        assert!(account.password().starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn test_create_invalid_account() {
        let service = service();

        let err = service
            .create(request("U", "user@example.com", PASSWORD))
            .await
            .unwrap_err();

        assert!(err.is_client_error());
        assert!(service.get(AccountId::new(1)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_authenticate() {
        let service = service();
        service
            .create(request("Username", "user@example.com", PASSWORD))
            .await
            .unwrap();

        let found = service.authenticate("Username", PASSWORD).await.unwrap();
        assert_eq!(found.unwrap().username(), "Username");

        assert!(service.authenticate("Username", "Wr0ng&Pass").await.unwrap().is_none());
        assert!(service.authenticate("nobody", PASSWORD).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_authenticate_after_password_change() {
        let service = service();
        let account = service
            .create(request("Username", "user@example.com", PASSWORD))
            .await
            .unwrap();

        service
            .update(
                account.id().unwrap(),
                AccountChanges::default().password("N3w&Passw0rd"),
            )
            .await
            .unwrap();

        assert!(service.authenticate("Username", PASSWORD).await.unwrap().is_none());
        assert!(service.authenticate("Username", "N3w&Passw0rd").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_authenticate_after_username_change() {
        let service = service();
        let account = service
            .create(request("Username", "user@example.com", PASSWORD))
            .await
            .unwrap();

        service
            .update(account.id().unwrap(), AccountChanges::default().username("Renamed"))
            .await
            .unwrap();

        // The stored credential must not have been hashed a second time
        assert!(service.authenticate("Renamed", PASSWORD).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_get_and_remove() {
        let service = service();
        let account = service
            .create(request("Username", "user@example.com", PASSWORD))
            .await
            .unwrap();
        let id = account.id().unwrap();

        assert!(service.get(id).await.unwrap().is_some());
        assert!(service.remove(id).await.unwrap());
        assert!(!service.remove(id).await.unwrap());
        assert!(service.get(id).await.unwrap().is_none());
    }
}
