//! Request identity.
//!
//! Every request resolves to exactly one [`Identity`]. An absent
//! `Authorization` header is the anonymous identity, not an error; a header
//! that is present but unusable is an [`IdentityRejection`] and is never
//! downgraded to anonymous.

use super::{Error, User};

/// Scheme accepted in the `Authorization` header.
pub const BEARER_SCHEME: &str = "Bearer";

/// Who is making the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// No credentials were presented.
    Anonymous,
    /// A valid token resolved to this user.
    Authenticated(User),
}

impl Identity {
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }

    /// Borrow the authenticated user, if any.
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(user) => Some(user),
        }
    }

    /// Gate for routes that need a logged-in caller.
    pub fn require_authenticated(self) -> Result<User, Unauthenticated> {
        require_authenticated(self)
    }
}

/// Convert an identity into its user, rejecting anonymous callers.
///
/// # Examples
/// ```
/// use workout_backend::domain::{Identity, require_authenticated};
///
/// assert!(require_authenticated(Identity::Anonymous).is_err());
/// ```
pub fn require_authenticated(identity: Identity) -> Result<User, Unauthenticated> {
    match identity {
        Identity::Anonymous => Err(Unauthenticated),
        Identity::Authenticated(user) => Ok(user),
    }
}

/// Raised when an anonymous caller reaches a route that needs a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("you must be logged in to access this route")]
pub struct Unauthenticated;

impl From<Unauthenticated> for Error {
    fn from(value: Unauthenticated) -> Self {
        Error::unauthorized(value.to_string())
    }
}

/// Reasons a presented `Authorization` header does not yield an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IdentityRejection {
    /// The header is not exactly `Bearer <token>`.
    #[error("invalid authorization header")]
    MalformedHeader,
    /// No live token matches, or the lookup could not be completed.
    #[error("invalid or expired token")]
    InvalidOrExpiredToken,
}

impl From<IdentityRejection> for Error {
    fn from(value: IdentityRejection) -> Self {
        Error::unauthorized(value.to_string())
    }
}

/// Extract the token from an `Authorization` header value.
///
/// The value must split on single spaces into exactly two parts, the first
/// being the literal `Bearer` and the second non-empty.
///
/// # Examples
/// ```
/// use workout_backend::domain::{IdentityRejection, parse_bearer};
///
/// assert_eq!(parse_bearer("Bearer abc123"), Ok("abc123"));
/// assert_eq!(parse_bearer("Basic abc123"), Err(IdentityRejection::MalformedHeader));
/// ```
pub fn parse_bearer(header: &str) -> Result<&str, IdentityRejection> {
    let mut parts = header.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(BEARER_SCHEME), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(IdentityRejection::MalformedHeader),
    }
}
