//! Session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A logged-in device/browser, independently revocable.
///
/// Sessions are created at login and destroyed on explicit revocation or
/// expiry. One user may hold many concurrent sessions. Expiry is enforced
/// lazily at read time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    /// Opaque, unguessable session identifier.
    pub id: Uuid,
    /// The user this session belongs to.
    pub user_id: Uuid,
    /// JWT ID of the credential issued with this session.
    pub token_id: Uuid,
    /// Client device description (parsed User-Agent).
    pub device_info: Option<String>,
    /// IP address from which the session was created.
    pub ip_address: String,
    /// Origin header at login, if any.
    pub origin: Option<String>,
    /// When the session was created (login time).
    pub created_at: DateTime<Utc>,
    /// Last authenticated request on this session.
    pub last_activity: DateTime<Utc>,
    /// When the session expires.
    pub expires_at: DateTime<Utc>,
    /// When the session was revoked, if it has been.
    pub revoked_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Check whether the session is live (not revoked and not expired).
    pub fn is_live(&self) -> bool {
        self.revoked_at.is_none() && self.expires_at > Utc::now()
    }

    /// Check whether the session has expired.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}
