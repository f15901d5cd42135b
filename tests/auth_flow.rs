//! End-to-end tests for login, logout, and credential handling.

mod common;

use common::{TestApp, body_json};

use axum::http::header;
use wikidash_entity::role::RoleName;

#[tokio::test]
async fn test_health_needs_no_credential() {
    let app = TestApp::new();
    let response = app.get("/api/health", None).await;
    assert_eq!(response.status(), 200);
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn test_login_sets_cookies_with_expected_attributes() {
    let app = TestApp::new();
    app.create_user("alice", "hunter2hunter2").await;

    let response = app
        .post(
            "/api/auth/login",
            None,
            serde_json::json!({ "username": "alice", "password": "hunter2hunter2" }),
        )
        .await;
    assert_eq!(response.status(), 200);

    let cookies: Vec<&str> = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap())
        .collect();
    assert_eq!(cookies.len(), 2);

    let auth_cookie = cookies
        .iter()
        .find(|c| c.starts_with("wikidash_token="))
        .expect("auth cookie missing");
    assert!(auth_cookie.contains("HttpOnly"));
    assert!(auth_cookie.contains("SameSite=Lax"));
    assert!(auth_cookie.contains("Max-Age=2592000"));

    assert!(cookies.iter().any(|c| c.starts_with("wikidash_session=")));

    let body = body_json(response).await;
    assert!(body["data"]["token"].as_str().unwrap().contains('.'));
    assert_eq!(body["data"]["user"]["username"], "alice");
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::new();
    app.create_user("alice", "hunter2hunter2").await;

    let wrong_password = app
        .post(
            "/api/auth/login",
            None,
            serde_json::json!({ "username": "alice", "password": "wrong" }),
        )
        .await;
    let unknown_user = app
        .post(
            "/api/auth/login",
            None,
            serde_json::json!({ "username": "mallory", "password": "wrong" }),
        )
        .await;

    assert_eq!(wrong_password.status(), 401);
    assert_eq!(unknown_user.status(), 401);
    let a = body_json(wrong_password).await;
    let b = body_json(unknown_user).await;
    assert_eq!(a["message"], b["message"]);
}

#[tokio::test]
async fn test_inactive_account_cannot_login() {
    let app = TestApp::new();
    let mut user = app.create_user("bob", "hunter2hunter2").await;
    user.active = false;
    app.users.put(user).await;

    let response = app
        .post(
            "/api/auth/login",
            None,
            serde_json::json!({ "username": "bob", "password": "hunter2hunter2" }),
        )
        .await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_me_accepts_bearer_and_cookie() {
    let app = TestApp::new();
    app.create_user("alice", "hunter2hunter2").await;
    let token = app.login("alice", "hunter2hunter2").await;

    let via_bearer = app.get("/api/auth/me", Some(&token)).await;
    assert_eq!(via_bearer.status(), 200);

    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/api/auth/me")
        .header(header::COOKIE, format!("wikidash_token={token}"))
        .body(axum::body::Body::empty())
        .unwrap();
    let via_cookie = tower::ServiceExt::oneshot(app.router.clone(), request)
        .await
        .unwrap();
    assert_eq!(via_cookie.status(), 200);
}

#[tokio::test]
async fn test_me_without_credential_is_unauthorized() {
    let app = TestApp::new();
    let response = app.get("/api/auth/me", None).await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_logout_kills_the_credential() {
    let app = TestApp::new();
    app.create_user("alice", "hunter2hunter2").await;
    let token = app.login("alice", "hunter2hunter2").await;

    let response = app.post_empty("/api/auth/logout", Some(&token)).await;
    assert_eq!(response.status(), 200);

    let after = app.get("/api/auth/me", Some(&token)).await;
    assert_eq!(after.status(), 401);
}

#[tokio::test]
async fn test_token_refresh_picks_up_new_roles() {
    let app = TestApp::new();
    let user = app.create_user("alice", "hunter2hunter2").await;
    let token = app.login("alice", "hunter2hunter2").await;

    app.grant_role(user.id, RoleName::ChapterModerator, Some(5))
        .await;

    let response = app.post_empty("/api/auth/token", Some(&token)).await;
    assert_eq!(response.status(), 200);
    let body = body_json(response).await;
    let fresh = body["data"]["token"].as_str().unwrap();

    let claims = app.codec.verify(fresh).unwrap();
    assert_eq!(claims.sub, user.id);
    assert_eq!(claims.roles.len(), 1);
    assert_eq!(claims.roles[0].chapter_id, Some(5));
}

#[tokio::test]
async fn test_revoke_token_endpoint() {
    let app = TestApp::new();
    app.create_user("alice", "hunter2hunter2").await;
    let token = app.login("alice", "hunter2hunter2").await;
    let token_id = app.codec.verify(&token).unwrap().jti;

    let response = app
        .post(
            "/api/auth/revoke-token",
            Some(&token),
            serde_json::json!({ "token_id": token_id }),
        )
        .await;
    assert_eq!(response.status(), 200);

    let after = app.get("/api/auth/me", Some(&token)).await;
    assert_eq!(after.status(), 401);
}

#[tokio::test]
async fn test_cannot_revoke_another_users_token() {
    let app = TestApp::new();
    app.create_user("alice", "hunter2hunter2").await;
    app.create_user("mallory", "hunter2hunter2").await;
    let alice_token = app.login("alice", "hunter2hunter2").await;
    let mallory_token = app.login("mallory", "hunter2hunter2").await;
    let alice_jti = app.codec.verify(&alice_token).unwrap().jti;

    // Knowing another user's token id must not grant revocation power.
    let response = app
        .post(
            "/api/auth/revoke-token",
            Some(&mallory_token),
            serde_json::json!({ "token_id": alice_jti }),
        )
        .await;
    assert_eq!(response.status(), 404);

    let still_valid = app.get("/api/auth/me", Some(&alice_token)).await;
    assert_eq!(still_valid.status(), 200);
}

#[tokio::test]
async fn test_tampered_token_is_rejected() {
    let app = TestApp::new();
    app.create_user("alice", "hunter2hunter2").await;
    let token = app.login("alice", "hunter2hunter2").await;
    let tampered = format!("{}x", token);

    let response = app.get("/api/auth/me", Some(&tampered)).await;
    assert_eq!(response.status(), 401);
}
