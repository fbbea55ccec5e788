//! Ownership checks for user-owned resources.

use super::{Error, User, UserId};

/// Whether a non-owner may learn that a resource exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OwnershipDisclosure {
    /// Non-owners receive `Forbidden`, missing resources `NotFound`.
    #[default]
    RevealExistence,
    /// Non-owners receive `NotFound`, indistinguishable from a missing resource.
    ConcealExistence,
}

/// Outcome of an ownership check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationDecision {
    Authorized,
    Forbidden,
    NotFound,
}

impl AuthorizationDecision {
    /// Turn a decision into a result, naming the resource in error messages.
    pub fn into_result(self, resource: &str) -> Result<(), Error> {
        match self {
            Self::Authorized => Ok(()),
            Self::Forbidden => Err(Error::forbidden(format!(
                "you do not have permission to access this {resource}"
            ))),
            Self::NotFound => Err(Error::not_found(format!("{resource} does not exist"))),
        }
    }
}

/// Decides whether an authenticated user may act on a resource.
///
/// # Examples
/// ```
/// use workout_backend::domain::{AuthorizationGuard, AuthorizationDecision, OwnershipDisclosure};
///
/// let guard = AuthorizationGuard::new(OwnershipDisclosure::RevealExistence);
/// assert_eq!(guard.decide(workout_backend::domain::UserId::new(1), None), AuthorizationDecision::NotFound);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthorizationGuard {
    disclosure: OwnershipDisclosure,
}

impl AuthorizationGuard {
    pub const fn new(disclosure: OwnershipDisclosure) -> Self {
        Self { disclosure }
    }

    pub fn disclosure(&self) -> OwnershipDisclosure {
        self.disclosure
    }

    /// Check `user` against the owner of a resource; `owner` is `None` when
    /// the resource does not exist.
    pub fn authorize(&self, user: &User, owner: Option<UserId>) -> AuthorizationDecision {
        self.decide(user.id, owner)
    }

    /// Same as [`AuthorizationGuard::authorize`] for a bare user id.
    pub fn decide(&self, caller: UserId, owner: Option<UserId>) -> AuthorizationDecision {
        match owner {
            None => AuthorizationDecision::NotFound,
            Some(owner) if owner == caller => AuthorizationDecision::Authorized,
            Some(_) => match self.disclosure {
                OwnershipDisclosure::RevealExistence => AuthorizationDecision::Forbidden,
                OwnershipDisclosure::ConcealExistence => AuthorizationDecision::NotFound,
            },
        }
    }
}
