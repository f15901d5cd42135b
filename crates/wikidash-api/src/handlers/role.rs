//! Role administration handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use wikidash_core::error::AppError;
use wikidash_entity::role::Permission;

use crate::dto::request::{AssignRoleRequest, RemoveRoleRequest};
use crate::dto::response::{ApiResponse, MessageResponse, RoleAssignmentResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/roles
pub async fn assign_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<AssignRoleRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<RoleAssignmentResponse>>)> {
    let assignment = state
        .roles
        .assign_role(auth.user.id, req.user_id, req.role, req.chapter_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(assignment.into())),
    ))
}

/// DELETE /api/roles
pub async fn remove_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<RemoveRoleRequest>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state
        .roles
        .remove_role(auth.user.id, req.user_id, req.role, req.chapter_id)
        .await?;

    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Role removed".to_string(),
    })))
}

/// GET /api/users/{id}/roles
///
/// A user can always read their own assignments; reading someone else's
/// requires a user- or role-management permission in some scope.
pub async fn list_user_roles(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Vec<RoleAssignmentResponse>>>> {
    if user_id != auth.user.id {
        let policies = state.roles.policies();
        let allowed = auth.roles.iter().any(|b| {
            policies.has_permission(b.role, Permission::ManageRoles)
                || policies.has_permission(b.role, Permission::ManageUsers)
        });
        if !allowed {
            return Err(AppError::forbidden("Not allowed to view this user's roles").into());
        }
    }

    let assignments = state.roles.list_assignments(user_id).await?;
    let body = assignments
        .into_iter()
        .map(RoleAssignmentResponse::from)
        .collect();

    Ok(Json(ApiResponse::ok(body)))
}
