//! Chat API integration tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{spawn_app, uuid_of};

#[tokio::test]
async fn test_create_chat_requires_friendship() {
    let app = spawn_app().await;
    let alice = app.signup("alice").await;
    let bob = app.signup("bob").await;

    app.server
        .post("/api/chats")
        .authorization_bearer(&alice.token)
        .json(&json!({ "participant_ids": [bob.id] }))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    app.server
        .post("/api/chats")
        .authorization_bearer(&alice.token)
        .json(&json!({ "participant_ids": [uuid::Uuid::new_v4()] }))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    app.server
        .post("/api/chats")
        .authorization_bearer(&alice.token)
        .json(&json!({ "participant_ids": [alice.id] }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_direct_chat_is_reused() {
    let app = spawn_app().await;
    let alice = app.signup("alice").await;
    let bob = app.signup("bob").await;
    let chat_id = app.befriend(&alice, &bob).await;

    let response = app
        .server
        .post("/api/chats")
        .authorization_bearer(&alice.token)
        .json(&json!({ "participant_ids": [bob.id, bob.id] }))
        .await;
    response.assert_status(StatusCode::OK);
    assert_eq!(uuid_of(&response.json::<Value>()["id"]), chat_id);
}

#[tokio::test]
async fn test_group_chat_with_friends() {
    let app = spawn_app().await;
    let alice = app.signup("alice").await;
    let bob = app.signup("bob").await;
    let carol = app.signup("carol").await;
    app.befriend(&alice, &bob).await;
    app.befriend(&alice, &carol).await;

    let response = app
        .server
        .post("/api/chats")
        .authorization_bearer(&alice.token)
        .json(&json!({ "participant_ids": [bob.id, carol.id] }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let chat: Value = response.json();
    assert_eq!(chat["participants"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_get_chat_access() {
    let app = spawn_app().await;
    let alice = app.signup("alice").await;
    let bob = app.signup("bob").await;
    let eve = app.signup("eve").await;
    let chat_id = app.befriend(&alice, &bob).await;

    app.server
        .get(&format!("/api/chats/{}", chat_id))
        .authorization_bearer(&bob.token)
        .await
        .assert_status_ok();

    app.server
        .get(&format!("/api/chats/{}", chat_id))
        .authorization_bearer(&eve.token)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    app.server
        .get(&format!("/api/chats/{}", uuid::Uuid::new_v4()))
        .authorization_bearer(&eve.token)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_chats_orders_by_activity_with_unread() {
    let app = spawn_app().await;
    let alice = app.signup("alice").await;
    let bob = app.signup("bob").await;
    let carol = app.signup("carol").await;
    let with_bob = app.befriend(&alice, &bob).await;
    let with_carol = app.befriend(&alice, &carol).await;

    app.send_message(&carol, with_carol, "first").await;
    app.send_message(&bob, with_bob, "second").await;
    app.send_message(&bob, with_bob, "third").await;

    let body: Value = app
        .server
        .get("/api/chats")
        .authorization_bearer(&alice.token)
        .await
        .json();

    let chats = body["chats"].as_array().unwrap();
    assert_eq!(uuid_of(&chats[0]["id"]), with_bob);
    assert_eq!(uuid_of(&chats[1]["id"]), with_carol);
    assert_eq!(chats[0]["unread_count"], 2);
    assert_eq!(chats[0]["last_message_preview"], "third");
    assert_eq!(body["total_unread"], 3);
}
