//! JWT claims structure embedded in every auth token.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use wikidash_entity::role::RoleBinding;

/// Claims payload of a wikidash credential.
///
/// The token is a stateless credential: signature-verifiable without a
/// store round trip. `jti` correlates it to at most one session or
/// revocation record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject — the user ID.
    pub sub: Uuid,
    /// JWT ID, used for revocation tracking.
    pub jti: Uuid,
    /// Session this token was issued with, if any. Tokens verified through
    /// the legacy remote path carry none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<Uuid>,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Role snapshot at issuance time. Convenience for clients; the gate
    /// always re-resolves roles from the store.
    #[serde(default)]
    pub roles: Vec<RoleBinding>,
}

impl Claims {
    /// Returns the user ID from the subject claim.
    pub fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Returns the token ID.
    pub fn token_id(&self) -> Uuid {
        self.jti
    }

    /// Checks whether this token has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}
