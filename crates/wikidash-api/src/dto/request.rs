//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use wikidash_entity::role::RoleName;

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username.
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Role grant request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignRoleRequest {
    /// The user receiving the role.
    pub user_id: Uuid,
    /// The role to grant.
    pub role: RoleName,
    /// The chapter scope; required for chapter roles, absent for global ones.
    pub chapter_id: Option<i64>,
}

/// Role removal request body. Identifies the exact assignment triple.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveRoleRequest {
    /// The user losing the role.
    pub user_id: Uuid,
    /// The role to remove.
    pub role: RoleName,
    /// The chapter scope of the assignment.
    pub chapter_id: Option<i64>,
}

/// Refresh token revocation request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevokeTokenRequest {
    /// The token id to revoke.
    pub token_id: Uuid,
}
