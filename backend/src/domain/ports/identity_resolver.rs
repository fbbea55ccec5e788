//! Driving port that turns an `Authorization` header into an [`Identity`].
//!
//! Inbound adapters call this once per request. `None` means the header was
//! absent and always yields [`Identity::Anonymous`].

use async_trait::async_trait;

use crate::domain::{Identity, IdentityRejection};

#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Resolve the raw header value, if one was sent.
    async fn resolve(&self, authorization: Option<&str>) -> Result<Identity, IdentityRejection>;
}
