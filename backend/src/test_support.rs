//! Test doubles shared by unit tests (in `src/`) and integration tests (in
//! `tests/`).
//!
//! Compiled for `cfg(test)` and behind the `test-support` feature so that
//! integration suites can drive the full HTTP stack without PostgreSQL.

mod backend;
mod clock;
mod memory;

pub use backend::{InMemoryBackend, test_app};
pub use clock::MutableClock;
pub use memory::{InMemoryTokenRepository, InMemoryUserRepository, InMemoryWorkoutRepository};

use crate::domain::PasswordHashingCost;

/// Smallest Argon2 cost accepted by the primitive, so tests hash quickly.
pub fn cheap_hashing_cost() -> PasswordHashingCost {
    PasswordHashingCost {
        memory_kib: 64,
        iterations: 1,
        parallelism: 1,
    }
}
