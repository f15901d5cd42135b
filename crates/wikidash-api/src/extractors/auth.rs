//! `AuthUser` extractor — pulls the credential from the Authorization header
//! or the auth cookie and runs it through the gate.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use wikidash_auth::gate::AuthContext;
use wikidash_core::error::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// Extracted authenticated context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub AuthContext);

impl std::ops::Deref for AuthUser {
    type Target = AuthContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Fast existence gate on the session cookie, before any signature
        // work or user resolution.
        if let Some(session_id) = cookie_value(parts, &state.config.cookie.session_name)
            .and_then(|v| v.parse::<uuid::Uuid>().ok())
        {
            if !state.gate.session_exists(session_id).await? {
                return Err(
                    AppError::unauthenticated("Session is no longer valid").into()
                );
            }
        }

        let token = extract_token(parts, &state.config.cookie.auth_name);
        let context = state.gate.authenticate(token.as_deref()).await?;
        Ok(AuthUser(context))
    }
}

/// Bearer header first, auth cookie as the browser fallback.
pub(crate) fn extract_token(parts: &Parts, cookie_name: &str) -> Option<String> {
    if let Some(header) = parts
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
    {
        if let Some(token) = header.strip_prefix("Bearer ") {
            return Some(token.to_string());
        }
    }

    cookie_value(parts, cookie_name)
}

/// Reads a single cookie out of the `Cookie` header.
pub(crate) fn cookie_value(parts: &Parts, name: &str) -> Option<String> {
    let header = parts.headers.get("cookie")?.to_str().ok()?;
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}
