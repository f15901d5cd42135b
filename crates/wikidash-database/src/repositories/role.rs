//! Role assignment repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use wikidash_core::error::{AppError, ErrorKind};
use wikidash_core::result::AppResult;
use wikidash_entity::role::{RoleAssignment, RoleName};

use crate::stores::RoleRepository;

/// Role assignment persistence over PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgRoleRepository {
    pool: PgPool,
}

impl PgRoleRepository {
    /// Create a new role repository over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleRepository for PgRoleRepository {
    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<RoleAssignment>> {
        sqlx::query_as::<_, RoleAssignment>(
            "SELECT * FROM role_assignments WHERE user_id = $1 ORDER BY assigned_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list role assignments", e)
        })
    }

    async fn insert(&self, assignment: &RoleAssignment) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO role_assignments (user_id, role, chapter_id, assigned_by, assigned_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(assignment.user_id)
        .bind(assignment.role)
        .bind(assignment.chapter_id)
        .bind(assignment.assigned_by)
        .bind(assignment.assigned_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            // The unique constraint resolves concurrent writers: the second
            // one lands here instead of silently overwriting.
            if e.as_database_error()
                .is_some_and(|db| db.is_unique_violation())
            {
                AppError::duplicate_assignment(format!(
                    "User {} already holds role '{}' for chapter {:?}",
                    assignment.user_id, assignment.role, assignment.chapter_id
                ))
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to insert role assignment", e)
            }
        })?;
        Ok(())
    }

    async fn delete(
        &self,
        user_id: Uuid,
        role: RoleName,
        chapter_id: Option<i64>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "DELETE FROM role_assignments \
             WHERE user_id = $1 AND role = $2 AND chapter_id IS NOT DISTINCT FROM $3",
        )
        .bind(user_id)
        .bind(role)
        .bind(chapter_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to delete role assignment", e)
        })?;
        Ok(result.rows_affected() > 0)
    }
}
