//! In-memory account store implementation

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::account::{
    Account, AccountChanges, AccountField, AccountId, AccountStore, CredentialHasher,
    LifecycleController, LifecycleEvent,
};
use crate::domain::DomainError;

/// In-memory implementation of AccountStore.
///
/// Lifecycle hooks run on a detached copy of the record before the write
/// lock is taken. At commit time only the fields an update changed are
/// copied onto the current record, and uniqueness is checked again.
#[derive(Debug)]
pub struct InMemoryAccountStore<H: CredentialHasher> {
    accounts: Arc<RwLock<BTreeMap<AccountId, Account>>>,
    next_id: AtomicU64,
    lifecycle: Arc<LifecycleController<H>>,
}

impl<H: CredentialHasher> InMemoryAccountStore<H> {
    /// Create a new empty store
    pub fn new(lifecycle: Arc<LifecycleController<H>>) -> Self {
        Self {
            accounts: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: AtomicU64::new(1),
            lifecycle,
        }
    }

    fn allocate_id(&self) -> AccountId {
        AccountId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }
}

/// Ensure no other account holds the same username or email
fn check_unique(
    accounts: &BTreeMap<AccountId, Account>,
    candidate: &Account,
    exclude: Option<AccountId>,
) -> Result<(), DomainError> {
    let others = accounts
        .iter()
        .filter(|(id, _)| Some(**id) != exclude)
        .map(|(_, account)| account);

    for other in others {
        if other.username() == candidate.username() {
            return Err(DomainError::conflict(format!(
                "Username '{}' already exists",
                candidate.username()
            )));
        }

        if other.email() == candidate.email() {
            return Err(DomainError::conflict(format!(
                "Email '{}' already exists",
                candidate.email()
            )));
        }
    }

    Ok(())
}

/// Copy the given fields from `source` onto `target`, leaving the rest as they are
fn copy_fields(target: &mut Account, source: &Account, fields: &[AccountField]) {
    for field in fields {
        match field {
            AccountField::Username => target.set_username(source.username()),
            AccountField::Email => target.set_email(source.email()),
            AccountField::Password => target.set_password(source.password()),
        }
    }
}

#[async_trait]
impl<H: CredentialHasher + 'static> AccountStore for InMemoryAccountStore<H> {
    async fn get(&self, id: AccountId) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().find(|a| a.username() == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().find(|a| a.email() == email).cloned())
    }

    async fn list(&self) -> Result<Vec<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().cloned().collect())
    }

    async fn insert(&self, mut account: Account) -> Result<Account, DomainError> {
        if account.is_persisted() {
            return Err(DomainError::conflict(format!(
                "Account '{}' is already persisted",
                account.id().map(|id| id.to_string()).unwrap_or_default()
            )));
        }

        self.lifecycle.apply(&LifecycleEvent::Insert, &mut account).await?;

        let mut accounts = self.accounts.write().await;
        check_unique(&accounts, &account, None)?;

        let id = self.allocate_id();
        account.mark_persisted(id, Utc::now());
        accounts.insert(id, account.clone());

        debug!(account_id = %id, "Account inserted");
        Ok(account)
    }

    async fn update(&self, id: AccountId, changes: AccountChanges) -> Result<Account, DomainError> {
        let mut account = self
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Account '{}' not found", id)))?;

        let changed = changes.apply_to(&mut account);
        if changed.is_empty() {
            return Ok(account);
        }

        let event = LifecycleEvent::update(changed.iter().map(|field| field.as_str()));
        self.lifecycle.apply(&event, &mut account).await?;

        // The record may have moved on while the hooks ran
        let mut accounts = self.accounts.write().await;
        let mut current = accounts
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(format!("Account '{}' not found", id)))?;
        copy_fields(&mut current, &account, &changed);
        check_unique(&accounts, &current, Some(id))?;

        current.touch(Utc::now());
        accounts.insert(id, current.clone());

        debug!(account_id = %id, fields = ?changed, "Account updated");
        Ok(current)
    }

    async fn remove(&self, id: AccountId) -> Result<Option<Account>, DomainError> {
        let mut accounts = self.accounts.write().await;
        Ok(accounts.remove(&id))
    }
}
