//! Route definitions for the wikidash HTTP API.
//!
//! All routes are mounted under `/api`. The router receives `AppState` and
//! passes it to all handlers via Axum's `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::Method,
    routing::{delete, get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.server.body_limit_bytes;

    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(session_routes())
        .merge(role_routes())
        .merge(health_routes());

    let cors = build_cors_layer(&state);

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Auth endpoints: login, logout, me, token refresh, token revocation.
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/me", get(handlers::auth::me))
        .route("/auth/token", post(handlers::auth::refresh_token))
        .route("/auth/revoke-token", post(handlers::auth::revoke_token))
}

/// Session self-service endpoints.
fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/sessions", get(handlers::session::list_sessions))
        .route("/sessions/{id}", delete(handlers::session::revoke_session))
        .route(
            "/sessions/revoke-others",
            post(handlers::session::revoke_others),
        )
}

/// Role administration endpoints.
fn role_routes() -> Router<AppState> {
    Router::new()
        .route("/roles", post(handlers::role::assign_role))
        .route("/roles", delete(handlers::role::remove_role))
        .route("/users/{id}/roles", get(handlers::role::list_user_roles))
}

/// Health check endpoint (no auth required).
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health_check))
}

/// Build CORS layer from configuration.
fn build_cors_layer(state: &AppState) -> CorsLayer {
    let allowed = &state.config.server.cors_allowed_origins;

    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);

    if allowed.contains(&"*".to_string()) {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<_> = allowed.iter().filter_map(|o| o.parse().ok()).collect();
        cors = cors.allow_origin(origins);
    }

    cors
}
