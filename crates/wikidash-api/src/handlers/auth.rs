//! Auth handlers — login, logout, me, token refresh, token revocation.

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::header::SET_COOKIE;
use axum::response::{AppendHeaders, IntoResponse};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use wikidash_core::error::AppError;

use crate::dto::request::{LoginRequest, RevokeTokenRequest};
use crate::dto::response::{
    ApiResponse, LoginResponse, MessageResponse, TokenResponse, UserResponse,
};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let user = state
        .users
        .find_by_username(&req.username)
        .await?
        .ok_or_else(|| AppError::unauthenticated("Invalid username or password"))?;

    if !state
        .password_hasher
        .verify_password(&req.password, &user.password_hash)?
    {
        return Err(AppError::unauthenticated("Invalid username or password").into());
    }
    if !user.can_login() {
        return Err(AppError::unauthenticated("Account is not active").into());
    }

    let token_id = Uuid::new_v4();
    let session = state
        .sessions
        .create(
            user.id,
            token_id,
            header_string(&headers, "user-agent"),
            client_ip(&headers),
            header_string(&headers, "origin"),
        )
        .await?;

    let roles = state.roles.get_user_roles(user.id).await?;
    let token = state
        .codec
        .issue_for_session(user.id, token_id, session.id, roles.clone())?;
    let expires_at = Utc::now() + state.codec.default_ttl();

    state.users.update_last_login(user.id, Utc::now()).await?;

    info!(user_id = %user.id, session_id = %session.id, "User logged in");

    let cookies = AppendHeaders([
        (
            SET_COOKIE,
            state
                .config
                .cookie
                .render(&state.config.cookie.auth_name, &token),
        ),
        (
            SET_COOKIE,
            state
                .config
                .cookie
                .render(&state.config.cookie.session_name, &session.id.to_string()),
        ),
    ]);

    let body = LoginResponse {
        token,
        expires_at,
        user: UserResponse::from_user(&user, roles),
    };

    Ok((cookies, Json(ApiResponse::ok(body))))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<impl IntoResponse> {
    state
        .sessions
        .blacklist_token(auth.token_id, auth.user.id, "logout")
        .await?;

    if let Some(session) = &auth.session {
        state.sessions.revoke(session.id).await?;
    }

    info!(user_id = %auth.user.id, "User logged out");

    let cookies = AppendHeaders([
        (
            SET_COOKIE,
            state
                .config
                .cookie
                .render_removal(&state.config.cookie.auth_name),
        ),
        (
            SET_COOKIE,
            state
                .config
                .cookie
                .render_removal(&state.config.cookie.session_name),
        ),
    ]);

    Ok((
        cookies,
        Json(ApiResponse::ok(MessageResponse {
            message: "Logged out successfully".to_string(),
        })),
    ))
}

/// GET /api/auth/me
pub async fn me(auth: AuthUser) -> Json<ApiResponse<UserResponse>> {
    Json(ApiResponse::ok(UserResponse::from_user(
        &auth.user,
        auth.roles.clone(),
    )))
}

/// POST /api/auth/token
///
/// Re-issues a credential embedding the caller's current role bindings, so a
/// role change takes effect without re-login.
pub async fn refresh_token(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<impl IntoResponse> {
    let session = auth
        .session
        .as_ref()
        .ok_or_else(|| AppError::validation("Credential is not bound to a session"))?;

    let token = state
        .roles
        .generate_updated_token(auth.user.id, session.id)
        .await?;

    let cookie = AppendHeaders([(
        SET_COOKIE,
        state
            .config
            .cookie
            .render(&state.config.cookie.auth_name, &token),
    )]);

    Ok((cookie, Json(ApiResponse::ok(TokenResponse { token }))))
}

/// POST /api/auth/revoke-token
///
/// Puts a token id on the revocation list. Only the caller's own tokens.
pub async fn revoke_token(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<RevokeTokenRequest>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state
        .sessions
        .revoke_refresh_token(req.token_id, auth.user.id)
        .await?;

    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Token revoked".to_string(),
    })))
}

fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

/// Client address from `x-forwarded-for`. Behind a proxy chain the header is
/// a comma-separated list; the first entry is the originating client.
fn client_ip(headers: &HeaderMap) -> String {
    header_string(headers, "x-forwarded-for")
        .and_then(|v| v.split(',').next().map(|ip| ip.trim().to_string()))
        .filter(|ip| !ip.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}
