//! Login request credentials.
//!
//! Login usernames are not held to registration rules: an unknown or
//! oddly-shaped username must fail the same way as a wrong password, so only
//! emptiness is checked here.

use zeroize::Zeroizing;

/// Raised when a login payload is missing a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    #[error("username is required")]
    EmptyUsername,
    #[error("password is required")]
    EmptyPassword,
}

/// Username and password presented to the token endpoint.
///
/// ## Invariants
/// - `username` is trimmed and non-empty.
/// - `password` is non-empty and kept verbatim, whitespace included.
///
/// # Examples
/// ```
/// use workout_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" alice ", "s3cret").expect("valid");
/// assert_eq!(creds.username(), "alice");
/// ```
#[derive(Clone)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username: username.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Hand the password to blocking work without copying it out of a
    /// zeroizing buffer.
    pub fn into_password(self) -> Zeroizing<String> {
        self.password
    }
}

impl std::fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
