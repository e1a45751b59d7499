//! Authentication API integration tests
//!
//! Signup, login by username or email, the current user endpoint and
//! logout revoking the token.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{spawn_app, PASSWORD};

#[tokio::test]
async fn test_signup_success() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/api/auth/signup")
        .json(&json!({
            "username": "alice",
            "email": "alice@example.com",
            "password": PASSWORD,
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["user"]["username"], "alice");
    assert_eq!(body["user"]["notification_mode"], "control");
    assert_eq!(body["user"]["notifications_enabled"], true);
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_signup_validation() {
    let app = spawn_app().await;

    for body in [
        json!({ "username": "al", "email": "al@example.com", "password": PASSWORD }),
        json!({ "username": "1alice", "email": "alice@example.com", "password": PASSWORD }),
        json!({ "username": "alice", "email": "not-an-email", "password": PASSWORD }),
        json!({ "username": "alice", "email": "alice@example.com", "password": "short" }),
    ] {
        app.server
            .post("/api/auth/signup")
            .json(&body)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_signup_duplicates_conflict() {
    let app = spawn_app().await;
    app.signup("alice").await;

    let same_name = app
        .server
        .post("/api/auth/signup")
        .json(&json!({ "username": "ALICE", "email": "other@example.com", "password": PASSWORD }))
        .await;
    same_name.assert_status(StatusCode::CONFLICT);
    assert_eq!(same_name.json::<Value>()["status"], 409);

    app.server
        .post("/api/auth/signup")
        .json(&json!({ "username": "alice2", "email": "alice@example.com", "password": PASSWORD }))
        .await
        .assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_login_with_username_or_email() {
    let app = spawn_app().await;
    let alice = app.signup("alice").await;

    for identifier in ["alice", "alice@example.com"] {
        let response = app
            .server
            .post("/api/auth/login")
            .json(&json!({ "identifier": identifier, "password": PASSWORD }))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["user"]["id"], alice.id.to_string());
    }
}

#[tokio::test]
async fn test_login_failures_look_the_same() {
    let app = spawn_app().await;
    app.signup("alice").await;

    let wrong_password = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "identifier": "alice", "password": "wrong password" }))
        .await;
    let unknown_user = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "identifier": "nobody", "password": PASSWORD }))
        .await;

    wrong_password.assert_status(StatusCode::UNAUTHORIZED);
    unknown_user.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(
        wrong_password.json::<Value>()["error"],
        unknown_user.json::<Value>()["error"]
    );
}

#[tokio::test]
async fn test_me_and_logout() {
    let app = spawn_app().await;
    let alice = app.signup("alice").await;

    let me = app.server.get("/api/auth/me").authorization_bearer(&alice.token).await;
    me.assert_status_ok();
    assert_eq!(me.json::<Value>()["email"], "alice@example.com");

    app.server
        .post("/api/auth/logout")
        .authorization_bearer(&alice.token)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    // The session is gone, so the token no longer works
    app.server
        .get("/api/auth/me")
        .authorization_bearer(&alice.token)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_rejects_garbage_token() {
    let app = spawn_app().await;
    app.server
        .get("/api/auth/me")
        .authorization_bearer("not.a.token")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_accepted_from_query() {
    let app = spawn_app().await;
    let alice = app.signup("alice").await;

    app.server
        .get(&format!("/api/auth/me?access_token={}", alice.token))
        .await
        .assert_status_ok();
}
