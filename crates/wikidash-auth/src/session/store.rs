//! Session store — session rows and revocation records.
//!
//! Sessions and revocation records are owned exclusively by this store; no
//! other component mutates them. Expiry is enforced lazily at read time.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::info;
use uuid::Uuid;

use wikidash_core::config::SessionConfig;
use wikidash_core::error::{AppError, ErrorKind};
use wikidash_core::result::AppResult;
use wikidash_database::stores::{RevocationRepository, SessionRepository};
use wikidash_entity::session::Session;
use wikidash_entity::token::RevocationRecord;

/// Maps a repository fault into `StoreUnavailable` so that protected routes
/// fail closed. Domain errors pass through untouched.
fn store_fault(err: AppError) -> AppError {
    if err.kind == ErrorKind::Database {
        AppError::new(ErrorKind::StoreUnavailable, err.message)
    } else {
        err
    }
}

/// Persists session records and token revocations.
#[derive(Clone)]
pub struct SessionStore {
    /// Session persistence.
    sessions: Arc<dyn SessionRepository>,
    /// Append-only revocation records.
    revocations: Arc<dyn RevocationRepository>,
    /// Session configuration.
    config: SessionConfig,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("config", &self.config)
            .finish()
    }
}

impl SessionStore {
    /// Creates a new session store.
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        revocations: Arc<dyn RevocationRepository>,
        config: SessionConfig,
    ) -> Self {
        Self {
            sessions,
            revocations,
            config,
        }
    }

    /// Creates a new session with a fresh opaque id and the configured TTL.
    pub async fn create(
        &self,
        user_id: Uuid,
        token_id: Uuid,
        device_info: Option<String>,
        ip_address: String,
        origin: Option<String>,
    ) -> AppResult<Session> {
        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4(),
            user_id,
            token_id,
            device_info,
            ip_address,
            origin,
            created_at: now,
            last_activity: now,
            expires_at: now + Duration::days(self.config.ttl_days as i64),
            revoked_at: None,
        };

        self.sessions
            .insert(&session)
            .await
            .map_err(store_fault)?;

        info!(user_id = %user_id, session_id = %session.id, "Session created");
        Ok(session)
    }

    /// Finds a session by id, live or not.
    pub async fn get(&self, session_id: Uuid) -> AppResult<Option<Session>> {
        self.sessions
            .find_by_id(session_id)
            .await
            .map_err(store_fault)
    }

    /// Lists live sessions for a user, newest first.
    pub async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Session>> {
        self.sessions
            .find_live_by_user(user_id)
            .await
            .map_err(store_fault)
    }

    /// Fast existence + expiry check for latency-sensitive gating. Does not
    /// resolve the user or roles.
    pub async fn is_valid(&self, session_id: Uuid) -> AppResult<bool> {
        self.sessions
            .exists_live(session_id)
            .await
            .map_err(store_fault)
    }

    /// Revokes a session. Idempotent; returns whether a live session was
    /// actually removed.
    pub async fn revoke(&self, session_id: Uuid) -> AppResult<bool> {
        let revoked = self
            .sessions
            .revoke(session_id, Utc::now())
            .await
            .map_err(store_fault)?;
        if revoked {
            info!(session_id = %session_id, "Session revoked");
        }
        Ok(revoked)
    }

    /// Revokes every session of `user_id` except `keep`. Returns the number
    /// revoked. Used for "log out other devices".
    pub async fn revoke_all_except(&self, user_id: Uuid, keep: Uuid) -> AppResult<u64> {
        let count = self
            .sessions
            .revoke_all_except(user_id, keep, Utc::now())
            .await
            .map_err(store_fault)?;
        if count > 0 {
            info!(user_id = %user_id, count, "Revoked other sessions");
        }
        Ok(count)
    }

    /// Appends a revocation record for a token. A structurally valid token
    /// whose id appears here must be treated as invalid.
    pub async fn blacklist_token(
        &self,
        token_id: Uuid,
        user_id: Uuid,
        reason: &str,
    ) -> AppResult<()> {
        let record = RevocationRecord {
            token_id,
            user_id,
            reason: reason.to_string(),
            revoked_at: Utc::now(),
        };
        self.revocations
            .insert(&record)
            .await
            .map_err(store_fault)?;
        info!(token_id = %token_id, user_id = %user_id, reason, "Token blacklisted");
        Ok(())
    }

    /// Revokes a refresh token by id. The token must have been issued with
    /// one of `user_id`'s own sessions; a foreign or unknown id is
    /// `NotFound`.
    pub async fn revoke_refresh_token(&self, token_id: Uuid, user_id: Uuid) -> AppResult<()> {
        let owned = self
            .sessions
            .owns_token(user_id, token_id)
            .await
            .map_err(store_fault)?;
        if !owned {
            return Err(AppError::not_found("Token not found"));
        }
        self.blacklist_token(token_id, user_id, "refresh token revoked")
            .await
    }

    /// Whether the token id has been revoked.
    pub async fn is_token_revoked(&self, token_id: Uuid) -> AppResult<bool> {
        self.revocations
            .is_revoked(token_id)
            .await
            .map_err(store_fault)
    }

    /// Updates the session's last-activity timestamp. Called on every
    /// admitted request.
    pub async fn touch_activity(&self, session_id: Uuid) -> AppResult<()> {
        self.sessions
            .touch_activity(session_id, Utc::now())
            .await
            .map_err(store_fault)
    }
}
