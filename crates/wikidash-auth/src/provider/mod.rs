//! Authentication providers — the seam between raw credentials and a
//! verified identity.
//!
//! The gate talks to a provider; whether the credential is checked locally
//! against the signing secret or forwarded to a remote verification service
//! is a deployment choice made in configuration.

pub mod local;
pub mod remote;

use async_trait::async_trait;
use uuid::Uuid;

use wikidash_core::result::AppResult;
use wikidash_entity::role::RoleBinding;

pub use local::LocalTokenProvider;
pub use remote::RemoteVerifyProvider;

/// The identity a provider vouches for after verifying a credential.
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    /// The authenticated user.
    pub user_id: Uuid,
    /// The credential's unique id.
    pub token_id: Uuid,
    /// The session the credential was minted for, when known.
    pub session_id: Option<Uuid>,
    /// Role snapshot embedded at issue time. Authorization decisions
    /// re-resolve roles from the store; this is informational.
    pub roles: Vec<RoleBinding>,
}

/// Verifies a bearer credential and produces the identity it asserts.
///
/// Implementations must fail with `ErrorKind::Unauthenticated` for every
/// credential defect and never return a partially trusted identity.
#[async_trait]
pub trait AuthenticationProvider: Send + Sync + 'static {
    /// Verify the credential string.
    async fn verify(&self, token: &str) -> AppResult<VerifiedIdentity>;
}
