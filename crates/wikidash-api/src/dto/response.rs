//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use wikidash_entity::role::{RoleAssignment, RoleBinding, RoleName};
use wikidash_entity::session::Session;
use wikidash_entity::user::User;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

/// Login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for API clients; browsers get the same value as a cookie.
    pub token: String,
    /// Token expiration.
    pub expires_at: DateTime<Utc>,
    /// The authenticated user.
    pub user: UserResponse,
}

/// Re-issued token response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The fresh token carrying the current role snapshot.
    pub token: String,
}

/// User summary for responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// User ID.
    pub id: Uuid,
    /// Username.
    pub username: String,
    /// Email.
    pub email: Option<String>,
    /// Whether the account is active.
    pub active: bool,
    /// Role bindings.
    pub roles: Vec<RoleBinding>,
    /// Created at.
    pub created_at: DateTime<Utc>,
    /// Last login.
    pub last_login_at: Option<DateTime<Utc>>,
}

impl UserResponse {
    /// Builds the response shape from a user and their bindings.
    pub fn from_user(user: &User, roles: Vec<RoleBinding>) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            active: user.active,
            roles,
            created_at: user.created_at,
            last_login_at: user.last_login_at,
        }
    }
}

/// A session as shown to its owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    /// Session ID.
    pub id: Uuid,
    /// Device description captured at login.
    pub device_info: Option<String>,
    /// Client IP captured at login.
    pub ip_address: String,
    /// Request origin captured at login.
    pub origin: Option<String>,
    /// Created at.
    pub created_at: DateTime<Utc>,
    /// Last seen.
    pub last_activity: DateTime<Utc>,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
    /// Whether this is the session making the request.
    pub current: bool,
}

impl SessionResponse {
    /// Builds the response shape, marking the caller's own session.
    pub fn from_session(session: &Session, current_session_id: Option<Uuid>) -> Self {
        Self {
            id: session.id,
            device_info: session.device_info.clone(),
            ip_address: session.ip_address.clone(),
            origin: session.origin.clone(),
            created_at: session.created_at,
            last_activity: session.last_activity,
            expires_at: session.expires_at,
            current: current_session_id == Some(session.id),
        }
    }
}

/// Count of sessions revoked by a bulk operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevokedCountResponse {
    /// Number of sessions revoked.
    pub revoked: u64,
}

/// A role assignment with grant metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleAssignmentResponse {
    /// The user holding the role.
    pub user_id: Uuid,
    /// The role held.
    pub role: RoleName,
    /// The chapter scope.
    pub chapter_id: Option<i64>,
    /// Who granted it.
    pub assigned_by: Uuid,
    /// When it was granted.
    pub assigned_at: DateTime<Utc>,
}

impl From<RoleAssignment> for RoleAssignmentResponse {
    fn from(a: RoleAssignment) -> Self {
        Self {
            user_id: a.user_id,
            role: a.role,
            chapter_id: a.chapter_id,
            assigned_by: a.assigned_by,
            assigned_at: a.assigned_at,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Crate version.
    pub version: String,
}
