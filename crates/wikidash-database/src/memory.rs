//! In-memory store implementations using Tokio mutexes.
//!
//! Suitable for tests and single-node demo deployments only; nothing
//! survives a restart.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use wikidash_core::error::AppError;
use wikidash_core::result::AppResult;
use wikidash_entity::role::{RoleAssignment, RoleName};
use wikidash_entity::session::Session;
use wikidash_entity::token::RevocationRecord;
use wikidash_entity::user::User;

use crate::stores::{RevocationRepository, RoleRepository, SessionRepository, UserStore};

/// In-memory user store.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<Mutex<HashMap<Uuid, User>>>,
}

impl MemoryUserStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a user. Test/demo seeding only.
    pub async fn put(&self, user: User) {
        self.users.lock().await.insert(user.id, user);
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.lock().await.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .await
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn update_last_login(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        if let Some(user) = self.users.lock().await.get_mut(&id) {
            user.last_login_at = Some(at);
        }
        Ok(())
    }
}

/// In-memory session repository.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionRepository {
    sessions: Arc<Mutex<HashMap<Uuid, Session>>>,
}

impl MemorySessionRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for MemorySessionRepository {
    async fn insert(&self, session: &Session) -> AppResult<()> {
        self.sessions
            .lock()
            .await
            .insert(session.id, session.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Session>> {
        Ok(self.sessions.lock().await.get(&id).cloned())
    }

    async fn find_live_by_user(&self, user_id: Uuid) -> AppResult<Vec<Session>> {
        let sessions = self.sessions.lock().await;
        let mut live: Vec<Session> = sessions
            .values()
            .filter(|s| s.user_id == user_id && s.is_live())
            .cloned()
            .collect();
        live.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(live)
    }

    async fn exists_live(&self, id: Uuid) -> AppResult<bool> {
        Ok(self
            .sessions
            .lock()
            .await
            .get(&id)
            .is_some_and(|s| s.is_live()))
    }

    async fn owns_token(&self, user_id: Uuid, token_id: Uuid) -> AppResult<bool> {
        Ok(self
            .sessions
            .lock()
            .await
            .values()
            .any(|s| s.user_id == user_id && s.token_id == token_id))
    }

    async fn revoke(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<bool> {
        let mut sessions = self.sessions.lock().await;
        match sessions.get_mut(&id) {
            Some(session) if session.is_live() => {
                session.revoked_at = Some(at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn revoke_all_except(
        &self,
        user_id: Uuid,
        keep: Uuid,
        at: DateTime<Utc>,
    ) -> AppResult<u64> {
        let mut sessions = self.sessions.lock().await;
        let mut revoked = 0u64;
        for session in sessions.values_mut() {
            if session.user_id == user_id && session.id != keep && session.is_live() {
                session.revoked_at = Some(at);
                revoked += 1;
            }
        }
        Ok(revoked)
    }

    async fn touch_activity(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        if let Some(session) = self.sessions.lock().await.get_mut(&id) {
            session.last_activity = at;
        }
        Ok(())
    }
}

/// In-memory role assignment repository.
#[derive(Debug, Clone, Default)]
pub struct MemoryRoleRepository {
    assignments: Arc<Mutex<Vec<RoleAssignment>>>,
}

impl MemoryRoleRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoleRepository for MemoryRoleRepository {
    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<RoleAssignment>> {
        Ok(self
            .assignments
            .lock()
            .await
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, assignment: &RoleAssignment) -> AppResult<()> {
        let mut assignments = self.assignments.lock().await;
        let duplicate = assignments.iter().any(|a| {
            a.user_id == assignment.user_id
                && a.role == assignment.role
                && a.chapter_id == assignment.chapter_id
        });
        if duplicate {
            return Err(AppError::duplicate_assignment(format!(
                "User {} already holds role '{}' for chapter {:?}",
                assignment.user_id, assignment.role, assignment.chapter_id
            )));
        }
        assignments.push(assignment.clone());
        Ok(())
    }

    async fn delete(
        &self,
        user_id: Uuid,
        role: RoleName,
        chapter_id: Option<i64>,
    ) -> AppResult<bool> {
        let mut assignments = self.assignments.lock().await;
        let before = assignments.len();
        assignments
            .retain(|a| !(a.user_id == user_id && a.role == role && a.chapter_id == chapter_id));
        Ok(assignments.len() < before)
    }
}

/// In-memory revocation repository.
#[derive(Debug, Clone, Default)]
pub struct MemoryRevocationRepository {
    records: Arc<Mutex<HashMap<Uuid, RevocationRecord>>>,
}

impl MemoryRevocationRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RevocationRepository for MemoryRevocationRepository {
    async fn insert(&self, record: &RevocationRecord) -> AppResult<()> {
        self.records
            .lock()
            .await
            .entry(record.token_id)
            .or_insert_with(|| record.clone());
        Ok(())
    }

    async fn is_revoked(&self, token_id: Uuid) -> AppResult<bool> {
        Ok(self.records.lock().await.contains_key(&token_id))
    }
}
