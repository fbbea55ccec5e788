//! Opaque bearer tokens.
//!
//! A token is 32 bytes from the operating system's CSPRNG, rendered as 64
//! lowercase hex characters. Only the SHA-256 digest of that text is ever
//! stored; the plaintext leaves the process exactly once, in the response to
//! the login that created it.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use super::UserId;

/// Number of random bytes behind each token.
pub const TOKEN_BYTES: usize = 32;

/// Purpose a token was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenScope {
    Authentication,
}

impl TokenScope {
    /// Label persisted in the `scope` column.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Authentication => "authentication",
        }
    }
}

impl fmt::Display for TokenScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a persisted scope label is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown token scope: {0}")]
pub struct UnknownTokenScope(pub String);

impl FromStr for TokenScope {
    type Err = UnknownTokenScope;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "authentication" => Ok(Self::Authentication),
            other => Err(UnknownTokenScope(other.to_owned())),
        }
    }
}

/// SHA-256 digest of a token's plaintext, used as its lookup key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenHash([u8; 32]);

impl TokenHash {
    /// Hash a presented plaintext exactly as issuance does.
    pub fn of_plaintext(plaintext: &str) -> Self {
        Self(Sha256::digest(plaintext.as_bytes()).into())
    }

    /// Rebuild a hash from stored bytes; `None` unless exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        <[u8; 32]>::try_from(bytes).ok().map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for TokenHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenHash({})", hex::encode(&self.0[..4]))
    }
}

/// Failures while minting a token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("entropy source failed: {message}")]
    Entropy { message: String },
    #[error("token expiry is out of range")]
    ExpiryOutOfRange,
}

/// The durable half of a token: everything except the plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRecord {
    pub hash: TokenHash,
    pub user_id: UserId,
    pub expiry: DateTime<Utc>,
    pub scope: TokenScope,
}

impl TokenRecord {
    /// A token is usable strictly before its expiry instant.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expiry
    }
}

/// A freshly minted token, holding the plaintext until it is handed out.
///
/// # Examples
/// ```
/// use chrono::{Duration, Utc};
/// use workout_backend::domain::{Token, TokenHash, TokenScope, UserId};
///
/// let now = Utc::now();
/// let token = Token::generate(UserId::new(7), Duration::hours(24), TokenScope::Authentication, now)
///     .expect("OS entropy is available");
/// assert_eq!(token.plaintext().len(), 64);
/// assert_eq!(token.record().hash, TokenHash::of_plaintext(token.plaintext()));
/// ```
pub struct Token {
    plaintext: Zeroizing<String>,
    record: TokenRecord,
}

impl Token {
    /// Mint a token from the operating system CSPRNG.
    pub fn generate(
        user_id: UserId,
        ttl: Duration,
        scope: TokenScope,
        now: DateTime<Utc>,
    ) -> Result<Self, TokenError> {
        Self::generate_with(&mut OsRng, user_id, ttl, scope, now)
    }

    /// Mint a token from the supplied random source.
    ///
    /// A failing source is reported, never substituted. A lifetime that
    /// carries the expiry past the representable range is rejected.
    pub fn generate_with<R>(
        rng: &mut R,
        user_id: UserId,
        ttl: Duration,
        scope: TokenScope,
        now: DateTime<Utc>,
    ) -> Result<Self, TokenError>
    where
        R: RngCore + ?Sized,
    {
        let expiry = now
            .checked_add_signed(ttl)
            .ok_or(TokenError::ExpiryOutOfRange)?;
        let mut bytes = Zeroizing::new([0_u8; TOKEN_BYTES]);
        rng.try_fill_bytes(&mut bytes[..])
            .map_err(|err| TokenError::Entropy {
                message: err.to_string(),
            })?;
        let plaintext = Zeroizing::new(hex::encode(&bytes[..]));
        let hash = TokenHash::of_plaintext(&plaintext);
        Ok(Self {
            plaintext,
            record: TokenRecord {
                hash,
                user_id,
                expiry,
                scope,
            },
        })
    }

    pub fn plaintext(&self) -> &str {
        self.plaintext.as_str()
    }

    pub fn record(&self) -> &TokenRecord {
        &self.record
    }

    /// Consume the token into the one-time wire view.
    pub fn into_issued(self) -> IssuedToken {
        IssuedToken {
            token: self.plaintext.as_str().to_owned(),
            expiry: self.record.expiry,
        }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("plaintext", &"<redacted>")
            .field("record", &self.record)
            .finish()
    }
}

/// Token as returned to the client that logged in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssuedToken {
    #[schema(example = "5f2b6c0e9d0a4e8b8c1d2e3f4a5b6c7d8e9f0a1b2c3d4e5f6a7b8c9d0e1f2a3b")]
    pub token: String,
    pub expiry: DateTime<Utc>,
}
