//! Shared test helpers: an in-memory application with the full router.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use wikidash_api::state::AppState;
use wikidash_auth::gate::AuthGate;
use wikidash_auth::password::PasswordHasher;
use wikidash_auth::provider::LocalTokenProvider;
use wikidash_auth::roles::RoleManager;
use wikidash_auth::session::SessionStore;
use wikidash_auth::token::TokenCodec;
use wikidash_core::config::{AppConfig, DatabaseConfig};
use wikidash_database::RoleRepository;
use wikidash_database::memory::{
    MemoryRevocationRepository, MemoryRoleRepository, MemorySessionRepository, MemoryUserStore,
};
use wikidash_entity::role::{RoleAssignment, RoleName};
use wikidash_entity::user::User;

/// Test application running the real router over in-memory stores.
pub struct TestApp {
    /// The Axum router for making test requests.
    pub router: Router,
    /// User store handle for seeding accounts.
    pub users: Arc<MemoryUserStore>,
    /// Role repository handle for seeding assignments.
    pub roles: Arc<MemoryRoleRepository>,
    /// Session store handle for direct assertions.
    pub sessions: SessionStore,
    /// Token codec sharing the app's secret.
    pub codec: TokenCodec,
    /// Password hasher matching the login handler's.
    pub hasher: PasswordHasher,
}

impl TestApp {
    /// Builds the application with empty stores.
    pub fn new() -> Self {
        let config = test_config();

        let users = Arc::new(MemoryUserStore::new());
        let roles_repo = Arc::new(MemoryRoleRepository::new());
        let codec = TokenCodec::new(&config.auth);
        let sessions = SessionStore::new(
            Arc::new(MemorySessionRepository::new()),
            Arc::new(MemoryRevocationRepository::new()),
            config.session.clone(),
        );
        let roles = RoleManager::new(
            roles_repo.clone(),
            users.clone(),
            codec.clone(),
            &config.session,
        );
        let provider = Arc::new(LocalTokenProvider::new(codec.clone(), sessions.clone()));
        let gate = AuthGate::new(
            provider,
            users.clone(),
            sessions.clone(),
            roles.clone(),
            &config.session,
        );

        let state = AppState {
            config: Arc::new(config),
            users: users.clone(),
            codec: codec.clone(),
            password_hasher: PasswordHasher::new(),
            sessions: sessions.clone(),
            roles,
            gate,
        };

        Self {
            router: wikidash_api::build_router(state),
            users,
            roles: roles_repo,
            sessions,
            codec,
            hasher: PasswordHasher::new(),
        }
    }

    /// Seeds an active user with the given password. Returns the user.
    pub async fn create_user(&self, username: &str, password: &str) -> User {
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: Some(format!("{username}@example.org")),
            password_hash: self.hasher.hash_password(password).unwrap(),
            active: true,
            claimed: true,
            created_at: Utc::now(),
            last_login_at: None,
        };
        self.users.put(user.clone()).await;
        user
    }

    /// Seeds a role assignment directly into the store.
    pub async fn grant_role(&self, user_id: Uuid, role: RoleName, chapter_id: Option<i64>) {
        self.roles
            .insert(&RoleAssignment {
                user_id,
                role,
                chapter_id,
                assigned_by: Uuid::new_v4(),
                assigned_at: Utc::now(),
            })
            .await
            .unwrap();
    }

    /// Logs in through the HTTP endpoint. Returns the bearer token.
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .post(
                "/api/auth/login",
                None,
                serde_json::json!({ "username": username, "password": password }),
            )
            .await;
        assert_eq!(response.status(), 200, "login failed");
        let body = body_json(response).await;
        body["data"]["token"].as_str().unwrap().to_string()
    }

    /// GET with an optional bearer token.
    pub async fn get(&self, path: &str, token: Option<&str>) -> Response<Body> {
        self.send(build_request("GET", path, token, None)).await
    }

    /// POST with an optional bearer token and JSON body.
    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> Response<Body> {
        self.send(build_request("POST", path, token, Some(body)))
            .await
    }

    /// POST with no body.
    pub async fn post_empty(&self, path: &str, token: Option<&str>) -> Response<Body> {
        self.send(build_request("POST", path, token, None)).await
    }

    /// DELETE with an optional bearer token and JSON body.
    pub async fn delete(
        &self,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response<Body> {
        self.send(build_request("DELETE", path, token, body)).await
    }

    async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }
}

fn test_config() -> AppConfig {
    let mut config = AppConfig {
        server: Default::default(),
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            max_connections: 1,
            min_connections: 0,
            connect_timeout_seconds: 1,
        },
        auth: Default::default(),
        session: Default::default(),
        cookie: Default::default(),
        logging: Default::default(),
    };
    config.auth.jwt_secret = "integration-test-secret-0123456789abcdef".to_string();
    config.cookie.secure = false;
    config
}

fn build_request(
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Collects a response body into JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
