//! User data model.
//!
//! Usernames and emails are validated at construction so that adapters and
//! services only ever see well-formed values. The password credential is kept
//! apart from [`User`]: only [`UserAccount`] pairs the two, and it is never
//! serialised.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use super::password::PasswordCredential;

/// Minimum allowed length for a username.
pub const USERNAME_MIN: usize = 3;
/// Maximum allowed length for a username.
pub const USERNAME_MAX: usize = 20;
/// Minimum allowed length for an email address.
pub const EMAIL_MIN: usize = 5;
/// Maximum allowed length for an email address.
pub const EMAIL_MAX: usize = 50;

/// Validation errors raised by user value constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("username is required")]
    EmptyUsername,
    #[error("username must be between {min} and {max} characters")]
    UsernameLength { min: usize, max: usize },
    #[error("email is required")]
    EmptyEmail,
    #[error("email must be between {min} and {max} characters")]
    EmailLength { min: usize, max: usize },
    #[error("invalid email format")]
    InvalidEmail,
    #[error("password is required")]
    EmptyPassword,
}

impl UserValidationError {
    /// Name of the request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyUsername | Self::UsernameLength { .. } => "username",
            Self::EmptyEmail | Self::EmailLength { .. } | Self::InvalidEmail => "email",
            Self::EmptyPassword => "password",
        }
    }
}

/// Store-assigned user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw identifier issued by the user store.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw integer value, as persisted.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique login name, 3 to 20 characters once trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        let length = trimmed.chars().count();
        if !(USERNAME_MIN..=USERNAME_MAX).contains(&length) {
            return Err(UserValidationError::UsernameLength {
                min: USERNAME_MIN,
                max: USERNAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Contact email address, 5 to 50 characters in `local@domain.tld` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and construct an [`Email`].
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        let length = trimmed.chars().count();
        if !(EMAIL_MIN..=EMAIL_MAX).contains(&length) {
            return Err(UserValidationError::EmailLength {
                min: EMAIL_MIN,
                max: EMAIL_MAX,
            });
        }
        if !email_regex().is_match(trimmed) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Application user as exposed to clients.
///
/// ## Invariants
/// - `username` and `email` are unique across users (enforced by the store).
/// - No credential material is reachable from this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[schema(value_type = i64, example = 1)]
    pub id: UserId,
    #[schema(value_type = String, example = "alice")]
    pub username: Username,
    #[schema(value_type = String, example = "alice@example.com")]
    pub email: Email,
    #[schema(example = "Runs on Tuesdays")]
    pub bio: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user together with their stored password credential.
///
/// Returned only by credential lookups used during login.
#[derive(Debug, Clone)]
pub struct UserAccount {
    pub user: User,
    pub credential: PasswordCredential,
}

/// Validated registration request, prior to hashing the password.
///
/// # Examples
/// ```
/// use workout_backend::domain::Registration;
///
/// let reg = Registration::try_from_parts("alice", "alice@example.com", "s3cret", "")
///     .expect("valid registration");
/// assert_eq!(reg.username().as_ref(), "alice");
/// ```
#[derive(Debug, Clone)]
pub struct Registration {
    username: Username,
    email: Email,
    password: Zeroizing<String>,
    bio: String,
}

impl Registration {
    /// Validate raw registration fields, reporting the first failure in
    /// username, email, password order.
    pub fn try_from_parts(
        username: &str,
        email: &str,
        password: &str,
        bio: &str,
    ) -> Result<Self, UserValidationError> {
        let username = Username::new(username)?;
        let email = Email::new(email)?;
        if password.is_empty() {
            return Err(UserValidationError::EmptyPassword);
        }
        Ok(Self {
            username,
            email,
            password: Zeroizing::new(password.to_owned()),
            bio: bio.to_owned(),
        })
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    pub fn bio(&self) -> &str {
        &self.bio
    }
}

/// Fields handed to the user store when creating an account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: Username,
    pub email: Email,
    pub bio: String,
    pub credential: PasswordCredential,
}

/// Profile changes a user may apply to themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub username: Username,
    pub bio: String,
}

#[cfg(test)]
mod tests;
