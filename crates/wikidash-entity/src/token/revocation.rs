//! Token revocation record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A durable marker invalidating an otherwise-valid token before its
/// natural expiry.
///
/// Records are append-only. Presence of a token id here means the token
/// must be treated as invalid even when its signature and expiry check out.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RevocationRecord {
    /// The revoked token's JWT ID.
    pub token_id: Uuid,
    /// The user the token was issued to.
    pub user_id: Uuid,
    /// Why the token was revoked (logout, admin action, rotation).
    pub reason: String,
    /// When the revocation was recorded.
    pub revoked_at: DateTime<Utc>,
}
