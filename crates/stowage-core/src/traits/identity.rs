//! Identity resolver trait for verifying bearer credentials.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// The caller identity asserted by a verified credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedIdentity {
    /// Stable subject identifier issued by the identity provider.
    pub subject: String,
    /// Email address, when the provider includes one.
    pub email: Option<String>,
    /// Display name, when the provider includes one.
    pub name: Option<String>,
}

/// Verifies a bearer credential issued by an external identity provider.
///
/// Implementations must return an `Unauthenticated` error for any
/// credential they cannot verify.
#[async_trait]
pub trait IdentityResolver: Send + Sync + std::fmt::Debug + 'static {
    /// Verify `token` and return the identity it asserts.
    async fn resolve(&self, token: &str) -> AppResult<VerifiedIdentity>;
}
