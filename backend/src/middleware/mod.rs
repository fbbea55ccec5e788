//! Request middleware.
//!
//! Purpose: request lifecycle concerns shared by every route: trace
//! correlation and identity resolution.

pub mod identity;
pub mod trace;

pub use identity::ResolveIdentity;
pub use trace::Trace;
