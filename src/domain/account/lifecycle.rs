//! Lifecycle hooks run by the store around every account write
//!
//! The store calls [`LifecycleController::apply`] (or one of the named hooks)
//! with the pending record before committing it. On `Ok` the record has been
//! validated and its password replaced by a derived credential where needed;
//! on `Err` the store must drop the write.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use super::credential::{CredentialError, CredentialHasher};
use super::entity::{Account, AccountField};
use super::validation::{AccountValidator, EntityValidator, ValidationError};

/// Why a pending write was rejected
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("Validation failed: {}", join_messages(.0))]
    ValidationFailed(Vec<ValidationError>),

    #[error(transparent)]
    CredentialDerivation(#[from] CredentialError),
}

impl LifecycleError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationFailed(_))
    }

    /// Rule violations carried by a validation failure
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            Self::ValidationFailed(errors) => errors,
            Self::CredentialDerivation(_) => &[],
        }
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A pending mutation of a single account
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// First persist of a record
    Insert,
    /// Persist of an existing record; carries the names of the changed fields
    Update { changed_fields: Vec<String> },
}

impl LifecycleEvent {
    pub fn update<I, S>(changed_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Update {
            changed_fields: changed_fields.into_iter().map(Into::into).collect(),
        }
    }
}

/// Runs validation and credential derivation around account writes
#[derive(Debug)]
pub struct LifecycleController<H: CredentialHasher, V = AccountValidator> {
    hasher: Arc<H>,
    validator: V,
}

impl<H: CredentialHasher> LifecycleController<H> {
    pub fn new(hasher: Arc<H>) -> Self {
        Self::with_validator(hasher, AccountValidator::new())
    }
}

impl<H, V> LifecycleController<H, V>
where
    H: CredentialHasher,
    V: EntityValidator<Account>,
{
    pub fn with_validator(hasher: Arc<H>, validator: V) -> Self {
        Self { hasher, validator }
    }

    /// Dispatch a lifecycle event to the matching hook
    pub async fn apply(
        &self,
        event: &LifecycleEvent,
        account: &mut Account,
    ) -> Result<(), LifecycleError> {
        match event {
            LifecycleEvent::Insert => self.before_insert(account).await,
            LifecycleEvent::Update { changed_fields } => {
                let fields: Vec<&str> = changed_fields.iter().map(String::as_str).collect();
                self.before_update(account, &fields).await
            }
        }
    }

    /// Validate every field and replace the plaintext password with its credential
    pub async fn before_insert(&self, account: &mut Account) -> Result<(), LifecycleError> {
        let errors = self.validator.validate_all_fields(account);
        reject_if_invalid(errors)?;

        self.derive_credential(account).await
    }

    /// Validate the changed fields; re-derive the credential only if the password changed
    pub async fn before_update(
        &self,
        account: &mut Account,
        changed_fields: &[&str],
    ) -> Result<(), LifecycleError> {
        let errors = self.validator.validate_selected_fields(account, changed_fields);
        reject_if_invalid(errors)?;

        if changed_fields.contains(&AccountField::Password.as_str()) {
            self.derive_credential(account).await?;
        }

        Ok(())
    }

    async fn derive_credential(&self, account: &mut Account) -> Result<(), LifecycleError> {
        let credential = self.hasher.hash(account.password()).await?;
        account.set_password(credential);
        Ok(())
    }
}

fn reject_if_invalid(errors: Vec<ValidationError>) -> Result<(), LifecycleError> {
    if errors.is_empty() {
        return Ok(());
    }

    let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
    debug!(?fields, "Rejecting account write");

    Err(LifecycleError::ValidationFailed(errors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::credential::MockCredentialHasher;

    const VALID_PASSWORD: &str = "cGW&%Rnjjq3E4KJ9";
    const STORED_CREDENTIAL: &str = "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA";

    fn valid_account() -> Account {
        Account::new("Username", "user@example.com", VALID_PASSWORD)
    }

    /// Hasher that prefixes the plaintext so tests can see it ran
    fn tagging_hasher() -> MockCredentialHasher {
        let mut hasher = MockCredentialHasher::new();
        hasher
            .expect_hash()
            .returning(|plaintext| Ok(format!("hashed:{}", plaintext)));
        hasher
    }

    fn untouched_hasher() -> MockCredentialHasher {
        let mut hasher = MockCredentialHasher::new();
        hasher.expect_hash().never();
        hasher
    }

    fn controller(hasher: MockCredentialHasher) -> LifecycleController<MockCredentialHasher> {
        LifecycleController::new(Arc::new(hasher))
    }

    #[tokio::test]
    async fn test_insert_hashes_password() {
        let controller = controller(tagging_hasher());
        let mut account = valid_account();

        controller.before_insert(&mut account).await.unwrap();

        assert_ne!(account.password(), VALID_PASSWORD);
        assert_eq!(account.password(), format!("hashed:{}", VALID_PASSWORD));
    }

    #[tokio::test]
    async fn test_insert_rejects_short_username_without_hashing() {
        let controller = controller(untouched_hasher());
        let mut account = valid_account();
        account.set_username("U");

        let err = controller.before_insert(&mut account).await.unwrap_err();

        assert!(err.is_validation());
        assert_eq!(err.validation_errors().len(), 1);
        assert_eq!(err.validation_errors()[0].field, AccountField::Username);
        assert_eq!(account.password(), VALID_PASSWORD);
    }

    #[tokio::test]
    async fn test_insert_reports_all_invalid_fields() {
        let controller = controller(untouched_hasher());
        let mut account = Account::new("U", "nope", "weak");

        let err = controller.before_insert(&mut account).await.unwrap_err();

        let fields: Vec<AccountField> = err.validation_errors().iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![AccountField::Username, AccountField::Email, AccountField::Password]
        );
    }

    #[tokio::test]
    async fn test_insert_hash_failure_leaves_password_untouched() {
        let mut hasher = MockCredentialHasher::new();
        hasher
            .expect_hash()
            .returning(|_| Err(CredentialError::derivation("out of memory")));
        let controller = controller(hasher);
        let mut account = valid_account();

        let err = controller.before_insert(&mut account).await.unwrap_err();

        assert_eq!(
            err,
            LifecycleError::CredentialDerivation(CredentialError::derivation("out of memory"))
        );
        assert!(!err.is_validation());
        assert!(err.validation_errors().is_empty());
        assert_eq!(account.password(), VALID_PASSWORD);
    }

    #[tokio::test]
    async fn test_update_checks_only_changed_fields() {
        let controller = controller(untouched_hasher());
        // Password is also invalid, but it did not change
        let mut account = Account::new("U", "user@example.com", "weak");

        let err = controller
            .before_update(&mut account, &["username"])
            .await
            .unwrap_err();

        let fields: Vec<AccountField> = err.validation_errors().iter().map(|e| e.field).collect();
        assert_eq!(fields, vec![AccountField::Username]);
        assert_eq!(account.password(), "weak");
    }

    #[tokio::test]
    async fn test_update_rehashes_changed_password() {
        let controller = controller(tagging_hasher());
        let mut account = valid_account();
        account.set_password("N3w&Passw0rd");

        controller
            .before_update(&mut account, &["password"])
            .await
            .unwrap();

        assert_eq!(account.password(), "hashed:N3w&Passw0rd");
    }

    #[tokio::test]
    async fn test_update_hash_failure_leaves_password_untouched() {
        let mut hasher = MockCredentialHasher::new();
        hasher
            .expect_hash()
            .times(1)
            .returning(|_| Err(CredentialError::derivation("out of memory")));
        let controller = controller(hasher);
        let mut account = valid_account();
        account.set_password("N3w&Passw0rd");

        let err = controller
            .before_update(&mut account, &["username", "password"])
            .await
            .unwrap_err();

        assert!(matches!(err, LifecycleError::CredentialDerivation(_)));
        assert!(!err.is_validation());
        assert_eq!(account.password(), "N3w&Passw0rd");
        assert_eq!(account.username(), "Username");
    }

    #[tokio::test]
    async fn test_update_without_password_change_keeps_credential() {
        let controller = controller(untouched_hasher());
        let mut account = Account::new("NewName", "user@example.com", STORED_CREDENTIAL);

        controller
            .before_update(&mut account, &["username"])
            .await
            .unwrap();

        assert_eq!(account.password(), STORED_CREDENTIAL);
    }

    #[tokio::test]
    async fn test_update_with_no_changed_fields_is_noop() {
        let controller = controller(untouched_hasher());
        let mut account = Account::new("U", "nope", STORED_CREDENTIAL);
        let before = account.clone();

        controller.before_update(&mut account, &[]).await.unwrap();

        assert_eq!(account, before);
    }

    #[tokio::test]
    async fn test_update_rejects_weak_password() {
        let controller = controller(untouched_hasher());
        let mut account = valid_account();
        account.set_password("password");

        let err = controller
            .before_update(&mut account, &["password"])
            .await
            .unwrap_err();

        assert_eq!(err.validation_errors()[0].field, AccountField::Password);
        assert_eq!(account.password(), "password");
    }

    #[tokio::test]
    async fn test_apply_dispatches_events() {
        let controller = controller(tagging_hasher());

        let mut inserted = valid_account();
        controller
            .apply(&LifecycleEvent::Insert, &mut inserted)
            .await
            .unwrap();
        assert_eq!(inserted.password(), format!("hashed:{}", VALID_PASSWORD));

        let mut updated = Account::new("Username", "user@example.com", STORED_CREDENTIAL);
        controller
            .apply(&LifecycleEvent::update(["email"]), &mut updated)
            .await
            .unwrap();
        assert_eq!(updated.password(), STORED_CREDENTIAL);
    }

    #[test]
    fn test_validation_failed_message() {
        let err = LifecycleError::ValidationFailed(vec![
            ValidationError::new(AccountField::Username, "Incorrect username"),
            ValidationError::new(AccountField::Email, "Incorrect email"),
        ]);

        assert_eq!(
            err.to_string(),
            "Validation failed: Incorrect username, Incorrect email"
        );
    }
}
