//! Application state shared across all handlers.

use std::sync::Arc;

use wikidash_auth::gate::AuthGate;
use wikidash_auth::password::PasswordHasher;
use wikidash_auth::roles::RoleManager;
use wikidash_auth::session::SessionStore;
use wikidash_auth::token::TokenCodec;
use wikidash_core::config::AppConfig;
use wikidash_database::UserStore;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. The components are
/// cheap to clone: the stores hold `Arc`'d trait objects internally.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// User account lookups.
    pub users: Arc<dyn UserStore>,
    /// Token issuance and verification.
    pub codec: TokenCodec,
    /// Password hashing and verification (Argon2id).
    pub password_hasher: PasswordHasher,
    /// Session lifecycle and token revocation.
    pub sessions: SessionStore,
    /// Role resolution and grant management.
    pub roles: RoleManager,
    /// The per-request admission pipeline.
    pub gate: AuthGate,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}
