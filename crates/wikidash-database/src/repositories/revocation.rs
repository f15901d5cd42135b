//! Token revocation repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use wikidash_core::error::{AppError, ErrorKind};
use wikidash_core::result::AppResult;
use wikidash_entity::token::RevocationRecord;

use crate::stores::RevocationRepository;

/// Append-only revocation records over PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgRevocationRepository {
    pool: PgPool,
}

impl PgRevocationRepository {
    /// Create a new revocation repository over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RevocationRepository for PgRevocationRepository {
    async fn insert(&self, record: &RevocationRecord) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO revoked_tokens (token_id, user_id, reason, revoked_at) \
             VALUES ($1, $2, $3, $4) ON CONFLICT (token_id) DO NOTHING",
        )
        .bind(record.token_id)
        .bind(record.user_id)
        .bind(&record.reason)
        .bind(record.revoked_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to record revocation", e)
        })?;
        Ok(())
    }

    async fn is_revoked(&self, token_id: Uuid) -> AppResult<bool> {
        let revoked: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM revoked_tokens WHERE token_id = $1)")
                .bind(token_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to check revocation", e)
                })?;
        Ok(revoked)
    }
}
