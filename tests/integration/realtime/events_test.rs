//! Which rooms receive which events

use assert_matches::assert_matches;
use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use chatline::shared::EventType;

use super::drain;
use crate::common::{spawn_app, TestApp, TestUser};

fn types(events: &[chatline::shared::RealtimeEvent]) -> Vec<EventType> {
    events.iter().map(|e| e.event_type).collect()
}

#[tokio::test]
async fn test_friend_request_reaches_recipient() {
    let app = spawn_app().await;
    let alice = app.signup("alice").await;
    let bob = app.signup("bob").await;
    let mut bob_rx = app.state.rooms.subscribe(bob.id);

    app.server
        .post("/api/friends/requests")
        .authorization_bearer(&alice.token)
        .json(&json!({ "to": "bob" }))
        .await
        .assert_status(StatusCode::CREATED);

    let events = drain(&mut bob_rx).await;
    assert_eq!(types(&events), vec![EventType::FriendRequestReceived, EventType::Notification]);
    assert_eq!(events[0].payload["from_username"], "alice");
}

#[tokio::test]
async fn test_accept_creates_chat_for_both() {
    let app = spawn_app().await;
    let alice = app.signup("alice").await;
    let bob = app.signup("bob").await;
    let mut alice_rx = app.state.rooms.subscribe(alice.id);
    let mut bob_rx = app.state.rooms.subscribe(bob.id);

    app.befriend(&alice, &bob).await;

    let to_alice = types(&drain(&mut alice_rx).await);
    assert!(to_alice.contains(&EventType::FriendRequestAccepted));
    assert!(to_alice.contains(&EventType::ChatCreated));

    let to_bob = types(&drain(&mut bob_rx).await);
    assert!(to_bob.contains(&EventType::FriendRequestReceived));
    assert!(to_bob.contains(&EventType::ChatCreated));
    assert!(!to_bob.contains(&EventType::FriendRequestAccepted));
}

async fn request_id(app: &TestApp, from: &TestUser, to: &str) -> String {
    let response = app
        .server
        .post("/api/friends/requests")
        .authorization_bearer(&from.token)
        .json(&json!({ "to": to }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<serde_json::Value>()["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_reject_and_cancel_reach_the_other_side() {
    let app = spawn_app().await;
    let alice = app.signup("alice").await;
    let bob = app.signup("bob").await;
    let mut alice_rx = app.state.rooms.subscribe(alice.id);
    let mut bob_rx = app.state.rooms.subscribe(bob.id);

    let first = request_id(&app, &alice, "bob").await;
    drain(&mut bob_rx).await;
    app.server
        .post(&format!("/api/friends/requests/{}/reject", first))
        .authorization_bearer(&bob.token)
        .await
        .assert_status_ok();

    let to_alice = drain(&mut alice_rx).await;
    assert_eq!(types(&to_alice), vec![EventType::FriendRequestRejected]);
    assert_eq!(to_alice[0].payload["id"], first.as_str());
    assert!(drain(&mut bob_rx).await.is_empty());

    let second = request_id(&app, &alice, "bob").await;
    drain(&mut bob_rx).await;
    app.server
        .delete(&format!("/api/friends/requests/{}", second))
        .authorization_bearer(&alice.token)
        .await
        .assert_status_ok();

    let to_bob = drain(&mut bob_rx).await;
    assert_eq!(types(&to_bob), vec![EventType::FriendRequestCancelled]);
    assert_eq!(to_bob[0].payload["status"], "cancelled");
    assert!(drain(&mut alice_rx).await.is_empty());
}

#[tokio::test]
async fn test_new_message_fan_out_and_notification_gating() {
    let app = spawn_app().await;
    let alice = app.signup("alice").await;
    let bob = app.signup("bob").await;
    let chat_id = app.befriend(&alice, &bob).await;

    let mut alice_rx = app.state.rooms.subscribe(alice.id);
    let mut bob_rx = app.state.rooms.subscribe(bob.id);

    let message = app.send_message(&alice, chat_id, "hi bob").await;

    let to_bob = drain(&mut bob_rx).await;
    assert_eq!(types(&to_bob), vec![EventType::NewMessage, EventType::Notification]);
    assert_eq!(to_bob[0].payload["id"], message["id"]);
    assert_eq!(to_bob[1].payload["title"], "alice");

    // The sender sees the message on other devices, without a notification
    assert_eq!(types(&drain(&mut alice_rx).await), vec![EventType::NewMessage]);

    // Control mode with notifications off: message still arrives, silently
    app.server
        .put("/api/profile/notifications")
        .authorization_bearer(&bob.token)
        .json(&json!({ "enabled": false }))
        .await
        .assert_status_ok();
    app.send_message(&alice, chat_id, "are you there?").await;
    assert_eq!(types(&drain(&mut bob_rx).await), vec![EventType::NewMessage]);

    // Fun mode always notifies
    app.server
        .put("/api/profile/mode")
        .authorization_bearer(&bob.token)
        .json(&json!({ "mode": "fun" }))
        .await
        .assert_status_ok();
    app.send_message(&alice, chat_id, "hello?").await;
    assert_eq!(types(&drain(&mut bob_rx).await), vec![EventType::NewMessage, EventType::Notification]);
}

#[tokio::test]
async fn test_typing_and_read_go_to_others_only() {
    let app = spawn_app().await;
    let alice = app.signup("alice").await;
    let bob = app.signup("bob").await;
    let chat_id = app.befriend(&alice, &bob).await;
    app.send_message(&alice, chat_id, "ping").await;

    let mut alice_rx = app.state.rooms.subscribe(alice.id);
    let mut bob_rx = app.state.rooms.subscribe(bob.id);

    app.server
        .post(&format!("/api/chats/{}/typing", chat_id))
        .authorization_bearer(&bob.token)
        .await
        .assert_status(StatusCode::NO_CONTENT);
    app.server
        .post(&format!("/api/chats/{}/read", chat_id))
        .authorization_bearer(&bob.token)
        .await
        .assert_status_ok();

    let to_alice = drain(&mut alice_rx).await;
    assert_eq!(types(&to_alice), vec![EventType::Typing, EventType::MessagesRead]);
    assert_eq!(to_alice[0].payload["is_typing"], true);
    assert_eq!(to_alice[1].payload["reader_id"], bob.id.to_string());
    assert!(drain(&mut bob_rx).await.is_empty());

    // Nothing newly read, nothing emitted
    app.server
        .post(&format!("/api/chats/{}/read", chat_id))
        .authorization_bearer(&bob.token)
        .await
        .assert_status_ok();
    assert!(drain(&mut alice_rx).await.is_empty());
}

#[tokio::test]
async fn test_reaction_and_delete_reach_all_participants() {
    let app = spawn_app().await;
    let alice = app.signup("alice").await;
    let bob = app.signup("bob").await;
    let chat_id = app.befriend(&alice, &bob).await;
    let message = app.send_message(&alice, chat_id, "nice").await;
    let message_id = message["id"].as_str().unwrap().to_string();

    let mut alice_rx = app.state.rooms.subscribe(alice.id);
    let mut bob_rx = app.state.rooms.subscribe(bob.id);

    app.server
        .post(&format!("/api/messages/{}/reactions", message_id))
        .authorization_bearer(&bob.token)
        .json(&json!({ "emoji": "🔥" }))
        .await
        .assert_status_ok();
    app.server
        .delete(&format!("/api/messages/{}", message_id))
        .authorization_bearer(&alice.token)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    for rx in [&mut alice_rx, &mut bob_rx] {
        let events = drain(rx).await;
        assert_eq!(types(&events), vec![EventType::MessageReaction, EventType::MessageDeleted]);
        assert_eq!(events[1].payload["message_id"], message_id);
    }
}

#[tokio::test]
async fn test_unfriend_notifies_other_side() {
    let app = spawn_app().await;
    let alice = app.signup("alice").await;
    let bob = app.signup("bob").await;
    app.befriend(&alice, &bob).await;
    let mut bob_rx = app.state.rooms.subscribe(bob.id);

    app.server
        .delete(&format!("/api/friends/{}", bob.id))
        .authorization_bearer(&alice.token)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let events = drain(&mut bob_rx).await;
    assert_matches!(events.as_slice(), [event] if event.event_type == EventType::FriendRemoved);
    assert_eq!(events[0].payload["user_id"], alice.id.to_string());
}

#[tokio::test]
async fn test_subscription_rejects_unknown_types() {
    let app = spawn_app().await;
    let alice = app.signup("alice").await;

    app.server
        .get("/realtime?types=new_message,bogus")
        .authorization_bearer(&alice.token)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    app.server.get("/realtime").await.assert_status(StatusCode::UNAUTHORIZED);
}
