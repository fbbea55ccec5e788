//! Password credential hashing and verification.
//!
//! Passwords are hashed with Argon2id into a PHC string (`$argon2id$v=19$...`)
//! carrying its own salt and cost parameters, so verification never needs the
//! current configuration. Plaintext passwords are only ever borrowed; callers
//! hold them in `Zeroizing` buffers.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

/// Argon2id work factor.
///
/// The default matches the parameters recommended by the `argon2` crate
/// (19 MiB, two passes, one lane).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordHashingCost {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordHashingCost {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl PasswordHashingCost {
    /// Check that Argon2 accepts these parameters.
    pub fn validate(&self) -> Result<(), CredentialError> {
        self.hasher().map(|_| ())
    }

    fn hasher(&self) -> Result<Argon2<'static>, CredentialError> {
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|err| CredentialError::hashing(err.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// Failures of the hashing primitive.
///
/// A wrong password is not an error: [`PasswordCredential::matches`] returns
/// `Ok(false)` for it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    #[error("password hashing failed: {message}")]
    Hashing { message: String },
    #[error("password verification failed: {message}")]
    Verification { message: String },
}

impl CredentialError {
    pub fn hashing(message: impl Into<String>) -> Self {
        Self::Hashing {
            message: message.into(),
        }
    }

    pub fn verification(message: impl Into<String>) -> Self {
        Self::Verification {
            message: message.into(),
        }
    }
}

/// Derived hash of a user's password.
///
/// # Examples
/// ```
/// use workout_backend::domain::{PasswordCredential, PasswordHashingCost};
///
/// let cost = PasswordHashingCost { memory_kib: 64, iterations: 1, parallelism: 1 };
/// let credential = PasswordCredential::set("hunter2", &cost).expect("hashing succeeds");
/// assert!(credential.matches("hunter2").expect("verification succeeds"));
/// assert!(!credential.matches("hunter3").expect("verification succeeds"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordCredential {
    phc: Vec<u8>,
}

impl PasswordCredential {
    /// Hash `plaintext` with a fresh random salt.
    pub fn set(plaintext: &str, cost: &PasswordHashingCost) -> Result<Self, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = cost
            .hasher()?
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|err| CredentialError::hashing(err.to_string()))?;
        Ok(Self {
            phc: hash.to_string().into_bytes(),
        })
    }

    /// Hash of a random secret nobody knows.
    ///
    /// Login verifies unknown usernames against it so they cost the same as
    /// a wrong password.
    pub fn decoy(cost: &PasswordHashingCost) -> Result<Self, CredentialError> {
        let secret = SaltString::generate(&mut OsRng);
        Self::set(secret.as_str(), cost)
    }

    /// Rebuild a credential from the bytes held by the user store.
    pub fn from_stored(phc: Vec<u8>) -> Self {
        Self { phc }
    }

    /// Stored representation (PHC string bytes).
    pub fn as_bytes(&self) -> &[u8] {
        &self.phc
    }

    /// Check `plaintext` against the stored hash.
    ///
    /// Returns `Ok(false)` on a mismatch and an error only when the stored
    /// value cannot be interpreted or the primitive itself fails.
    pub fn matches(&self, plaintext: &str) -> Result<bool, CredentialError> {
        let phc = std::str::from_utf8(&self.phc)
            .map_err(|_| CredentialError::verification("stored hash is not valid UTF-8"))?;
        let parsed =
            PasswordHash::new(phc).map_err(|err| CredentialError::verification(err.to_string()))?;
        match Argon2::default().verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(err) => Err(CredentialError::verification(err.to_string())),
        }
    }
}

impl std::fmt::Debug for PasswordCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordCredential(<redacted>)")
    }
}
