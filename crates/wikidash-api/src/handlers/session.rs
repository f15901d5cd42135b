//! Session handlers — listing and revoking the caller's sessions.

use axum::Json;
use axum::extract::{Path, State};
use tracing::info;
use uuid::Uuid;

use wikidash_core::error::AppError;

use crate::dto::response::{ApiResponse, MessageResponse, RevokedCountResponse, SessionResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/sessions
///
/// Lists the caller's live sessions, newest first.
pub async fn list_sessions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<SessionResponse>>>> {
    let current_id = auth.session.as_ref().map(|s| s.id);
    let sessions = state.sessions.list_by_user(auth.user.id).await?;

    let body = sessions
        .iter()
        .map(|s| SessionResponse::from_session(s, current_id))
        .collect();

    Ok(Json(ApiResponse::ok(body)))
}

/// DELETE /api/sessions/{id}
///
/// Revokes one of the caller's sessions. Foreign or unknown session ids are
/// indistinguishable: both 404.
pub async fn revoke_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    let session = state
        .sessions
        .get(session_id)
        .await?
        .filter(|s| s.user_id == auth.user.id)
        .ok_or_else(|| AppError::not_found("Session not found"))?;

    state.sessions.revoke(session.id).await?;

    info!(user_id = %auth.user.id, session_id = %session.id, "Session revoked by owner");

    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Session revoked".to_string(),
    })))
}

/// POST /api/sessions/revoke-others
///
/// Revokes every session of the caller except the one making the request.
pub async fn revoke_others(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<RevokedCountResponse>>> {
    let session = auth
        .session
        .as_ref()
        .ok_or_else(|| AppError::validation("Credential is not bound to a session"))?;

    let revoked = state
        .sessions
        .revoke_all_except(auth.user.id, session.id)
        .await?;

    info!(user_id = %auth.user.id, revoked, "Other sessions revoked");

    Ok(Json(ApiResponse::ok(RevokedCountResponse { revoked })))
}
