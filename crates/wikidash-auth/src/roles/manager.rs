//! Role manager — resolves, grants, and removes role assignments.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use moka::future::Cache;
use tracing::info;
use uuid::Uuid;

use wikidash_core::config::SessionConfig;
use wikidash_core::error::AppError;
use wikidash_core::result::AppResult;
use wikidash_database::{RoleRepository, UserStore};
use wikidash_entity::role::{Permission, RoleAssignment, RoleBinding, RoleName};

use super::policies::RolePolicies;
use crate::token::TokenCodec;

/// Resolves user roles, enforces the grant rules, and refreshes the role
/// snapshot embedded in credentials.
///
/// Assignments are read through a short-lived per-user cache; writes
/// invalidate the cached entry so the next read sees the new state.
#[derive(Clone)]
pub struct RoleManager {
    /// Role assignment persistence.
    roles: Arc<dyn RoleRepository>,
    /// User lookups for target validation.
    users: Arc<dyn UserStore>,
    /// Codec used to mint refreshed credentials.
    codec: TokenCodec,
    /// Static role-to-permission matrix.
    policies: RolePolicies,
    /// Per-user role snapshots.
    snapshot_cache: Cache<Uuid, Arc<Vec<RoleBinding>>>,
}

impl RoleManager {
    /// Creates a new role manager.
    pub fn new(
        roles: Arc<dyn RoleRepository>,
        users: Arc<dyn UserStore>,
        codec: TokenCodec,
        config: &SessionConfig,
    ) -> Self {
        let snapshot_cache = Cache::builder()
            .max_capacity(10_000)
            .time_to_live(Duration::from_secs(config.role_cache_ttl_seconds))
            .build();

        Self {
            roles,
            users,
            codec,
            policies: RolePolicies::new(),
            snapshot_cache,
        }
    }

    /// Returns the (role, chapter) bindings a user currently holds.
    pub async fn get_user_roles(&self, user_id: Uuid) -> AppResult<Vec<RoleBinding>> {
        let roles = self.roles.clone();
        let snapshot = self
            .snapshot_cache
            .try_get_with(user_id, async move {
                let assignments = roles.find_by_user(user_id).await?;
                Ok::<_, AppError>(Arc::new(
                    assignments.iter().map(RoleAssignment::binding).collect(),
                ))
            })
            .await
            .map_err(|e| (*e).clone())?;

        Ok(snapshot.as_ref().clone())
    }

    /// Returns the full assignments held by a user, grant metadata included.
    pub async fn list_assignments(&self, user_id: Uuid) -> AppResult<Vec<RoleAssignment>> {
        self.roles.find_by_user(user_id).await
    }

    /// Whether the actor may grant or remove roles in the given scope.
    ///
    /// A global `super_admin` manages every scope. A `chapter_admin` manages
    /// exactly their own chapter; they manage nothing in the global scope.
    pub async fn can_manage_roles(
        &self,
        actor_id: Uuid,
        chapter_id: Option<i64>,
    ) -> AppResult<bool> {
        let bindings = self.get_user_roles(actor_id).await?;
        Ok(bindings.iter().any(|b| match b.role {
            RoleName::SuperAdmin => true,
            RoleName::ChapterAdmin => chapter_id.is_some() && b.chapter_id == chapter_id,
            _ => false,
        }))
    }

    /// Whether any binding the user holds grants the permission in the scope.
    pub async fn has_permission(
        &self,
        user_id: Uuid,
        permission: Permission,
        chapter_id: Option<i64>,
    ) -> AppResult<bool> {
        let bindings = self.get_user_roles(user_id).await?;
        Ok(bindings
            .iter()
            .any(|b| b.applies_to(chapter_id) && self.policies.has_permission(b.role, permission)))
    }

    /// Grants a role to a user.
    ///
    /// Global roles may only be granted by a `super_admin`. Chapter-scoped
    /// grants require management rights over that chapter. Granting a triple
    /// the user already holds fails with `DuplicateAssignment`.
    pub async fn assign_role(
        &self,
        actor_id: Uuid,
        user_id: Uuid,
        role: RoleName,
        chapter_id: Option<i64>,
    ) -> AppResult<RoleAssignment> {
        validate_scope(role, chapter_id)?;
        self.require_management(actor_id, role, chapter_id).await?;

        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(AppError::not_found("User not found"));
        }

        let assignment = RoleAssignment {
            user_id,
            role,
            chapter_id,
            assigned_by: actor_id,
            assigned_at: Utc::now(),
        };
        self.roles.insert(&assignment).await?;
        self.snapshot_cache.invalidate(&user_id).await;

        info!(
            user_id = %user_id,
            role = %role,
            chapter_id = ?chapter_id,
            assigned_by = %actor_id,
            "Role assigned"
        );

        Ok(assignment)
    }

    /// Removes a role from a user. Fails with `NotFound` if the triple does
    /// not exist.
    pub async fn remove_role(
        &self,
        actor_id: Uuid,
        user_id: Uuid,
        role: RoleName,
        chapter_id: Option<i64>,
    ) -> AppResult<()> {
        validate_scope(role, chapter_id)?;
        self.require_management(actor_id, role, chapter_id).await?;

        let existed = self.roles.delete(user_id, role, chapter_id).await?;
        if !existed {
            return Err(AppError::not_found("Role assignment not found"));
        }
        self.snapshot_cache.invalidate(&user_id).await;

        info!(
            user_id = %user_id,
            role = %role,
            chapter_id = ?chapter_id,
            removed_by = %actor_id,
            "Role removed"
        );

        Ok(())
    }

    /// Issues a fresh credential carrying the user's current role bindings.
    ///
    /// Used after a grant or removal so the client does not have to wait for
    /// the old credential to expire to see its new roles.
    pub async fn generate_updated_token(
        &self,
        user_id: Uuid,
        session_id: Uuid,
    ) -> AppResult<String> {
        self.snapshot_cache.invalidate(&user_id).await;
        let bindings = self.get_user_roles(user_id).await?;
        self.codec
            .issue_for_session(user_id, Uuid::new_v4(), session_id, bindings)
    }

    /// Invalidates the cached role snapshot for a user.
    pub async fn invalidate(&self, user_id: Uuid) {
        self.snapshot_cache.invalidate(&user_id).await;
    }

    /// Returns a reference to the policy matrix.
    pub fn policies(&self) -> &RolePolicies {
        &self.policies
    }

    async fn require_management(
        &self,
        actor_id: Uuid,
        role: RoleName,
        chapter_id: Option<i64>,
    ) -> AppResult<()> {
        if role.is_global() {
            let bindings = self.get_user_roles(actor_id).await?;
            if !bindings.iter().any(|b| b.role == RoleName::SuperAdmin) {
                return Err(AppError::forbidden(
                    "Only a super admin can manage global roles",
                ));
            }
            return Ok(());
        }

        if !self.can_manage_roles(actor_id, chapter_id).await? {
            return Err(AppError::forbidden(
                "Not allowed to manage roles for this chapter",
            ));
        }
        Ok(())
    }
}

impl std::fmt::Debug for RoleManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoleManager").finish_non_exhaustive()
    }
}

/// Chapter-scoped roles need a chapter; global roles must not carry one.
fn validate_scope(role: RoleName, chapter_id: Option<i64>) -> AppResult<()> {
    if role.is_chapter_scoped() && chapter_id.is_none() {
        return Err(AppError::validation(format!(
            "Role '{role}' requires a chapter"
        )));
    }
    if role.is_global() && chapter_id.is_some() {
        return Err(AppError::validation(format!(
            "Role '{role}' is global and cannot be scoped to a chapter"
        )));
    }
    Ok(())
}
