//! Local authentication provider — verifies credentials against the
//! configured signing secret and the revocation list.

use async_trait::async_trait;
use tracing::debug;

use wikidash_core::error::AppError;
use wikidash_core::result::AppResult;

use super::{AuthenticationProvider, VerifiedIdentity};
use crate::session::SessionStore;
use crate::token::TokenCodec;

/// Verifies tokens in-process: signature and expiry through the codec, then
/// the per-token revocation list.
#[derive(Clone)]
pub struct LocalTokenProvider {
    codec: TokenCodec,
    sessions: SessionStore,
}

impl LocalTokenProvider {
    /// Creates a new local provider.
    pub fn new(codec: TokenCodec, sessions: SessionStore) -> Self {
        Self { codec, sessions }
    }
}

#[async_trait]
impl AuthenticationProvider for LocalTokenProvider {
    async fn verify(&self, token: &str) -> AppResult<VerifiedIdentity> {
        let claims = self.codec.verify(token).inspect_err(|e| {
            debug!(reason = %e, "Token verification failed");
        })?;

        if self.sessions.is_token_revoked(claims.jti).await? {
            return Err(AppError::unauthenticated("Token has been revoked"));
        }

        Ok(VerifiedIdentity {
            user_id: claims.sub,
            token_id: claims.jti,
            session_id: claims.sid,
            roles: claims.roles,
        })
    }
}
