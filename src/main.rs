//! wikidash server — authentication, session, and role management backend
//! for the chapter dashboard.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use wikidash_api::state::AppState;
use wikidash_auth::gate::AuthGate;
use wikidash_auth::password::PasswordHasher;
use wikidash_auth::provider::{AuthenticationProvider, LocalTokenProvider, RemoteVerifyProvider};
use wikidash_auth::roles::RoleManager;
use wikidash_auth::session::SessionStore;
use wikidash_auth::token::TokenCodec;
use wikidash_core::config::AppConfig;
use wikidash_core::error::AppError;
use wikidash_database::repositories::{
    PgRevocationRepository, PgRoleRepository, PgSessionRepository, PgUserStore,
};

#[tokio::main]
async fn main() {
    let env = std::env::var("WIKIDASH_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting wikidash v{}", env!("CARGO_PKG_VERSION"));

    tracing::info!("Connecting to database...");
    let db_pool = wikidash_database::connection::create_pool(&config.database).await?;

    tracing::info!("Running database migrations...");
    wikidash_database::migration::run_migrations(&db_pool).await?;
    tracing::info!("Database migrations complete");

    // Repositories
    let users = Arc::new(PgUserStore::new(db_pool.clone()));
    let sessions_repo = Arc::new(PgSessionRepository::new(db_pool.clone()));
    let roles_repo = Arc::new(PgRoleRepository::new(db_pool.clone()));
    let revocations = Arc::new(PgRevocationRepository::new(db_pool.clone()));

    // Auth components
    let codec = TokenCodec::new(&config.auth);
    let sessions = SessionStore::new(sessions_repo, revocations, config.session.clone());
    let roles = RoleManager::new(roles_repo, users.clone(), codec.clone(), &config.session);

    let provider: Arc<dyn AuthenticationProvider> = match config.auth.provider.as_str() {
        "remote" => {
            tracing::info!("Using remote token verification");
            Arc::new(RemoteVerifyProvider::new(&config.auth)?)
        }
        _ => Arc::new(LocalTokenProvider::new(codec.clone(), sessions.clone())),
    };

    let gate = AuthGate::new(
        provider,
        users.clone(),
        sessions.clone(),
        roles.clone(),
        &config.session,
    );

    let bind_address = config.server.bind_address();
    let state = AppState {
        config: Arc::new(config),
        users,
        codec,
        password_hasher: PasswordHasher::new(),
        sessions,
        roles,
        gate,
    };

    let router = wikidash_api::build_router(state);

    tracing::info!("Listening on {bind_address}");
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {bind_address}: {e}")))?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server failed: {e}")))?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves when the process receives SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
