//! Friend request workflow integration tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{spawn_app, uuid_of, TestApp, TestUser};

async fn send_request(app: &TestApp, from: &TestUser, to: &str) -> axum_test::TestResponse {
    app.server
        .post("/api/friends/requests")
        .authorization_bearer(&from.token)
        .json(&json!({ "to": to }))
        .await
}

#[tokio::test]
async fn test_send_request_rules() {
    let app = spawn_app().await;
    let alice = app.signup("alice").await;
    let bob = app.signup("bob").await;

    send_request(&app, &alice, "nobody").await.assert_status(StatusCode::NOT_FOUND);
    send_request(&app, &alice, "alice").await.assert_status(StatusCode::BAD_REQUEST);
    send_request(&app, &alice, "").await.assert_status(StatusCode::BAD_REQUEST);

    // By email works too
    send_request(&app, &alice, "bob@example.com").await.assert_status(StatusCode::CREATED);

    // Pending in either direction blocks a new request
    send_request(&app, &alice, "bob").await.assert_status(StatusCode::CONFLICT);
    send_request(&app, &bob, "alice").await.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_request_lists() {
    let app = spawn_app().await;
    let alice = app.signup("alice").await;
    let bob = app.signup("bob").await;
    send_request(&app, &alice, "bob").await.assert_status(StatusCode::CREATED);

    let bob_view: Value = app
        .server
        .get("/api/friends/requests")
        .authorization_bearer(&bob.token)
        .await
        .json();
    assert_eq!(bob_view["incoming"].as_array().unwrap().len(), 1);
    assert_eq!(bob_view["incoming"][0]["from_username"], "alice");
    assert_eq!(bob_view["outgoing"].as_array().unwrap().len(), 0);

    let alice_view: Value = app
        .server
        .get("/api/friends/requests")
        .authorization_bearer(&alice.token)
        .await
        .json();
    assert_eq!(alice_view["outgoing"][0]["to_username"], "bob");
}

#[tokio::test]
async fn test_accept_makes_friends_and_direct_chat() {
    let app = spawn_app().await;
    let alice = app.signup("alice").await;
    let bob = app.signup("bob").await;

    let request: Value = send_request(&app, &alice, "bob").await.json();
    let request_id = uuid_of(&request["id"]);

    // Only the recipient may accept
    app.server
        .post(&format!("/api/friends/requests/{}/accept", request_id))
        .authorization_bearer(&alice.token)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let response = app
        .server
        .post(&format!("/api/friends/requests/{}/accept", request_id))
        .authorization_bearer(&bob.token)
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["request"]["status"], "accepted");
    assert_eq!(body["chat"]["participants"].as_array().unwrap().len(), 2);

    // Terminal: a second accept conflicts
    app.server
        .post(&format!("/api/friends/requests/{}/accept", request_id))
        .authorization_bearer(&bob.token)
        .await
        .assert_status(StatusCode::CONFLICT);

    let friends: Value = app
        .server
        .get("/api/friends")
        .authorization_bearer(&alice.token)
        .await
        .json();
    assert_eq!(friends["friends"][0]["username"], "bob");

    send_request(&app, &alice, "bob").await.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_reject_and_cancel() {
    let app = spawn_app().await;
    let alice = app.signup("alice").await;
    let bob = app.signup("bob").await;

    let first = uuid_of(&send_request(&app, &alice, "bob").await.json::<Value>()["id"]);
    let response = app
        .server
        .post(&format!("/api/friends/requests/{}/reject", first))
        .authorization_bearer(&bob.token)
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "rejected");

    // Rejected requests no longer block a new one
    let second = uuid_of(&send_request(&app, &alice, "bob").await.json::<Value>()["id"]);

    // Only the sender may cancel
    app.server
        .delete(&format!("/api/friends/requests/{}", second))
        .authorization_bearer(&bob.token)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let response = app
        .server
        .delete(&format!("/api/friends/requests/{}", second))
        .authorization_bearer(&alice.token)
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "cancelled");

    app.server
        .post(&format!("/api/friends/requests/{}/reject", second))
        .authorization_bearer(&bob.token)
        .await
        .assert_status(StatusCode::CONFLICT);

    app.server
        .post(&format!("/api/friends/requests/{}/accept", uuid::Uuid::new_v4()))
        .authorization_bearer(&bob.token)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_remove_friend_keeps_chat() {
    let app = spawn_app().await;
    let alice = app.signup("alice").await;
    let bob = app.signup("bob").await;
    let chat_id = app.befriend(&alice, &bob).await;
    app.send_message(&alice, chat_id, "hello").await;

    app.server
        .delete(&format!("/api/friends/{}", bob.id))
        .authorization_bearer(&alice.token)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    app.server
        .delete(&format!("/api/friends/{}", bob.id))
        .authorization_bearer(&alice.token)
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let friends: Value = app
        .server
        .get("/api/friends")
        .authorization_bearer(&bob.token)
        .await
        .json();
    assert!(friends["friends"].as_array().unwrap().is_empty());

    let history: Value = app
        .server
        .get(&format!("/api/chats/{}/messages", chat_id))
        .authorization_bearer(&bob.token)
        .await
        .json();
    assert_eq!(history["messages"].as_array().unwrap().len(), 1);

    // Becoming friends again lands in the same chat
    assert_eq!(app.befriend(&bob, &alice).await, chat_id);
}

#[tokio::test]
async fn test_crossed_requests_leave_one_pending() {
    let app = spawn_app().await;
    let alice = app.signup("alice").await;
    let bob = app.signup("bob").await;

    let (from_alice, from_bob) = tokio::join!(
        send_request(&app, &alice, "bob"),
        send_request(&app, &bob, "alice"),
    );
    let mut statuses = vec![from_alice.status_code(), from_bob.status_code()];
    statuses.sort();
    assert_eq!(statuses, vec![StatusCode::CREATED, StatusCode::CONFLICT]);

    let lists: Value = app
        .server
        .get("/api/friends/requests")
        .authorization_bearer(&alice.token)
        .await
        .json();
    let pending = lists["incoming"].as_array().unwrap().len() + lists["outgoing"].as_array().unwrap().len();
    assert_eq!(pending, 1);
}
