//! Common test utilities and helpers
//!
//! - `spawn_app` - a `TestServer` over a fresh in-memory database
//! - `TestApp::signup` / `befriend` / `send_message` - API shortcuts

#![allow(dead_code)]

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};
use uuid::Uuid;

use chatline::backend::routes::create_router;
use chatline::backend::server::{build_state, AppState};
use chatline::shared::AppConfig;

pub const PASSWORD: &str = "correct horse battery";

pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
}

#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub username: String,
    pub token: String,
}

pub fn test_config() -> AppConfig {
    AppConfig::builder()
        .database_url("sqlite::memory:")
        .jwt_secret("integration-test-secret-value")
        .password_cost(4)
        .room_capacity(64)
        .build()
        .expect("test config is valid")
}

pub async fn spawn_app() -> TestApp {
    let state = build_state(test_config()).await.expect("state builds");
    let server = TestServer::new(create_router(state.clone())).expect("test server starts");
    TestApp { server, state }
}

pub fn uuid_of(value: &Value) -> Uuid {
    value.as_str().and_then(|s| s.parse().ok()).expect("value is a uuid")
}

impl TestApp {
    pub async fn signup(&self, username: &str) -> TestUser {
        let response = self
            .server
            .post("/api/auth/signup")
            .json(&json!({
                "username": username,
                "email": format!("{}@example.com", username),
                "password": PASSWORD,
            }))
            .await;
        response.assert_status(StatusCode::CREATED);

        let body: Value = response.json();
        TestUser {
            id: uuid_of(&body["user"]["id"]),
            username: username.to_string(),
            token: body["token"].as_str().expect("token").to_string(),
        }
    }

    /// Send and accept a friend request; returns the direct chat id
    pub async fn befriend(&self, from: &TestUser, to: &TestUser) -> Uuid {
        let response = self
            .server
            .post("/api/friends/requests")
            .authorization_bearer(&from.token)
            .json(&json!({ "to": to.username }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let request_id = uuid_of(&response.json::<Value>()["id"]);

        let response = self
            .server
            .post(&format!("/api/friends/requests/{}/accept", request_id))
            .authorization_bearer(&to.token)
            .await;
        response.assert_status_ok();
        uuid_of(&response.json::<Value>()["chat"]["id"])
    }

    pub async fn send_message(&self, from: &TestUser, chat_id: Uuid, content: &str) -> Value {
        let response = self
            .server
            .post(&format!("/api/chats/{}/messages", chat_id))
            .authorization_bearer(&from.token)
            .json(&json!({ "content": content }))
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json()
    }
}
