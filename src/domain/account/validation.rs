//! Account validation rules

use serde::Serialize;
use validator::ValidateEmail;

use super::entity::{Account, AccountField};

const MIN_USERNAME_LENGTH: usize = 2;
const MAX_USERNAME_LENGTH: usize = 255;
const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_PASSWORD_LENGTH: usize = 32;

pub const INCORRECT_USERNAME: &str = "Incorrect username";
pub const INCORRECT_EMAIL: &str = "Incorrect email";
pub const WEAK_PASSWORD: &str = "Password does not meet password requirements";

/// A single rule violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: AccountField,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: AccountField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Field-level validation of an entity.
///
/// Both operations are total: an empty list means the entity is valid.
pub trait EntityValidator<E>: Send + Sync {
    /// Apply every rule the validator knows about
    fn validate_all_fields(&self, entity: &E) -> Vec<ValidationError>;

    /// Apply only the rules named in `fields`; unknown names are ignored
    fn validate_selected_fields(&self, entity: &E, fields: &[&str]) -> Vec<ValidationError>;
}

/// Validator for [`Account`] over the closed set of username, email and password
#[derive(Debug, Clone, Copy, Default)]
pub struct AccountValidator;

impl AccountValidator {
    pub fn new() -> Self {
        Self
    }

    fn check(&self, account: &Account, field: AccountField) -> Option<ValidationError> {
        let (valid, message) = match field {
            AccountField::Username => (is_valid_username(account.username()), INCORRECT_USERNAME),
            AccountField::Email => (is_valid_email(account.email()), INCORRECT_EMAIL),
            AccountField::Password => (is_strong_password(account.password()), WEAK_PASSWORD),
        };

        (!valid).then(|| ValidationError::new(field, message))
    }
}

impl EntityValidator<Account> for AccountValidator {
    fn validate_all_fields(&self, account: &Account) -> Vec<ValidationError> {
        AccountField::ALL
            .into_iter()
            .filter_map(|field| self.check(account, field))
            .collect()
    }

    fn validate_selected_fields(&self, account: &Account, fields: &[&str]) -> Vec<ValidationError> {
        // Iterate the known fields rather than the input so ordering stays fixed
        AccountField::ALL
            .into_iter()
            .filter(|field| fields.contains(&field.as_str()))
            .filter_map(|field| self.check(account, field))
            .collect()
    }
}

/// Username length must be within 2..=255 characters
pub fn is_valid_username(username: &str) -> bool {
    let length = username.chars().count();
    (MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&length)
}

/// Email must be well-formed and addressed to a dotted domain name.
///
/// IP literals and single-label hosts such as `localhost` are refused.
pub fn is_valid_email(email: &str) -> bool {
    if !email.validate_email() {
        return false;
    }

    match email.rsplit_once('@') {
        Some((_, domain)) => has_public_domain(domain),
        None => false,
    }
}

fn has_public_domain(domain: &str) -> bool {
    if domain.starts_with('[') {
        return false;
    }

    let tld = match domain.rsplit_once('.') {
        Some((_, tld)) => tld,
        None => return false,
    };

    let alphabetic = tld.chars().count() >= 2 && tld.chars().all(char::is_alphabetic);
    let punycode = tld.len() > 4 && tld.to_ascii_lowercase().starts_with("xn--");

    alphabetic || punycode
}

/// Password rules:
/// - 8 to 32 characters
/// - at least one lowercase letter, uppercase letter, digit and symbol
pub fn is_strong_password(password: &str) -> bool {
    let length = password.chars().count();
    if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&length) {
        return false;
    }

    let mut lowercase = false;
    let mut uppercase = false;
    let mut digit = false;
    let mut symbol = false;

    for c in password.chars() {
        lowercase |= c.is_ascii_lowercase();
        uppercase |= c.is_ascii_uppercase();
        digit |= c.is_ascii_digit();
        symbol |= c.is_ascii_punctuation() || c == ' ' || c == '£';
    }

    lowercase && uppercase && digit && symbol
}
