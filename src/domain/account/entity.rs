//! Account entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account identifier assigned by the store on first persist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(u64);

impl AccountId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fields that carry validation rules, in check order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountField {
    Username,
    Email,
    Password,
}

impl AccountField {
    /// Every validated field, in the order rules are applied
    pub const ALL: [AccountField; 3] = [Self::Username, Self::Email, Self::Password];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Email => "email",
            Self::Password => "password",
        }
    }
}

impl std::fmt::Display for AccountField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account record.
///
/// `password` holds the plaintext until the insert hook has run and the
/// derived credential afterwards. Serializing an account yields its public
/// projection: the id, username and email only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Account {
    id: Option<AccountId>,
    username: String,
    email: String,
    #[serde(skip_serializing)]
    password: String,
    #[serde(skip_serializing)]
    created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing)]
    updated_at: Option<DateTime<Utc>>,
}

impl Account {
    /// Create an unpersisted account
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            username: username.into(),
            email: email.into(),
            password: password.into(),
            created_at: None,
            updated_at: None,
        }
    }

    // Getters

    pub fn id(&self) -> Option<AccountId> {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    // Mutators

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.username = username.into();
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
    }

    /// Stamp identity and timestamps on first persist
    pub(crate) fn mark_persisted(&mut self, id: AccountId, at: DateTime<Utc>) {
        self.id = Some(id);
        self.created_at = Some(at);
        self.updated_at = Some(at);
    }

    pub(crate) fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = Some(at);
    }
}

/// Pending partial update to a persisted account
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AccountChanges {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl AccountChanges {
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Merge into `account`, returning the fields whose value actually changed
    pub fn apply_to(self, account: &mut Account) -> Vec<AccountField> {
        let mut changed = Vec::new();

        if let Some(username) = self.username {
            if username != account.username {
                account.set_username(username);
                changed.push(AccountField::Username);
            }
        }

        if let Some(email) = self.email {
            if email != account.email {
                account.set_email(email);
                changed.push(AccountField::Email);
            }
        }

        // Always counts as a change: the stored value is a credential, not plaintext
        if let Some(password) = self.password {
            account.set_password(password);
            changed.push(AccountField::Password);
        }

        changed
    }
}
