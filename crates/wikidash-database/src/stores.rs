//! Store traits consumed by the auth core.
//!
//! The core never touches SQL directly: it holds `Arc<dyn ...>` handles to
//! these traits. The PostgreSQL implementations live in [`crate::repositories`];
//! in-memory implementations in [`crate::memory`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use wikidash_core::result::AppResult;
use wikidash_entity::role::{RoleAssignment, RoleName};
use wikidash_entity::session::Session;
use wikidash_entity::token::RevocationRecord;
use wikidash_entity::user::User;

/// Read access to user accounts.
///
/// Users are created by the registration flow outside this service; the
/// auth core only reads them (plus the login timestamp bookkeeping).
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Find a user by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find a user by username.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Record a successful login.
    async fn update_last_login(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()>;
}

/// Persistence for session rows. Owned exclusively by the session store.
#[async_trait]
pub trait SessionRepository: Send + Sync + 'static {
    /// Insert a new session row.
    async fn insert(&self, session: &Session) -> AppResult<()>;

    /// Find a session by id, live or not.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Session>>;

    /// List live sessions for a user, newest first.
    async fn find_live_by_user(&self, user_id: Uuid) -> AppResult<Vec<Session>>;

    /// Fast existence + expiry check. Must not join or resolve the user.
    async fn exists_live(&self, id: Uuid) -> AppResult<bool>;

    /// Whether any session of `user_id` was issued with `token_id`,
    /// regardless of liveness.
    async fn owns_token(&self, user_id: Uuid, token_id: Uuid) -> AppResult<bool>;

    /// Mark a session revoked. Returns whether a live session was hit.
    async fn revoke(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<bool>;

    /// Revoke every live session of a user except `keep`. Returns the count.
    async fn revoke_all_except(
        &self,
        user_id: Uuid,
        keep: Uuid,
        at: DateTime<Utc>,
    ) -> AppResult<u64>;

    /// Update the last-activity timestamp.
    async fn touch_activity(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()>;
}

/// Persistence for role assignments. Owned exclusively by the role manager.
#[async_trait]
pub trait RoleRepository: Send + Sync + 'static {
    /// List all assignments held by a user.
    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<RoleAssignment>>;

    /// Insert an assignment. A duplicate (user, role, chapter) triple yields
    /// `ErrorKind::DuplicateAssignment`; the backing store's uniqueness
    /// constraint gives the same answer under concurrency.
    async fn insert(&self, assignment: &RoleAssignment) -> AppResult<()>;

    /// Delete an assignment. Returns whether it existed.
    async fn delete(
        &self,
        user_id: Uuid,
        role: RoleName,
        chapter_id: Option<i64>,
    ) -> AppResult<bool>;
}

/// Append-only persistence for token revocation records.
#[async_trait]
pub trait RevocationRepository: Send + Sync + 'static {
    /// Append a revocation record. Re-revoking the same token id is a no-op.
    async fn insert(&self, record: &RevocationRecord) -> AppResult<()>;

    /// Whether the token id has been revoked.
    async fn is_revoked(&self, token_id: Uuid) -> AppResult<bool>;
}
