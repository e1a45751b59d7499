//! The `/realtime` event stream, read frame by frame

use std::time::Duration;

use axum::body::{Body, BodyDataStream};
use axum::http::{header, Request, StatusCode};
use futures_util::StreamExt;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

use chatline::backend::routes::create_router;

use crate::common::{spawn_app, TestUser};

async fn open_stream(app: &crate::common::TestApp, user: &TestUser, uri: &str) -> BodyDataStream {
    let request = Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", user.token))
        .body(Body::empty())
        .unwrap();
    let response = create_router(app.state.clone()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()),
        Some("text/event-stream")
    );
    response.into_body().into_data_stream()
}

/// Next `event:` frame, as (name, data)
async fn next_frame(body: &mut BodyDataStream, buffer: &mut String) -> (String, Value) {
    loop {
        if let Some(end) = buffer.find("\n\n") {
            let frame: String = buffer.drain(..end + 2).collect();
            let mut name = None;
            let mut data = None;
            for line in frame.lines() {
                if let Some(value) = line.strip_prefix("event: ") {
                    name = Some(value.to_string());
                } else if let Some(value) = line.strip_prefix("data: ") {
                    data = Some(serde_json::from_str(value).unwrap());
                }
            }
            // Keep-alive comments carry neither
            if let (Some(name), Some(data)) = (name, data) {
                return (name, data);
            }
            continue;
        }

        let chunk = tokio::time::timeout(Duration::from_secs(2), body.next())
            .await
            .expect("frame arrives in time")
            .expect("stream still open")
            .unwrap();
        buffer.push_str(std::str::from_utf8(&chunk).unwrap());
    }
}

#[tokio::test]
async fn test_stream_delivers_filtered_envelopes() {
    let app = spawn_app().await;
    let alice = app.signup("alice").await;
    let bob = app.signup("bob").await;
    let chat_id = app.befriend(&alice, &bob).await;

    let mut body = open_stream(&app, &bob, "/realtime?types=new_message,messages_read").await;
    assert!(app.state.rooms.is_online(bob.id));

    // Filtered out
    app.server
        .post(&format!("/api/chats/{}/typing", chat_id))
        .authorization_bearer(&alice.token)
        .json(&json!({ "is_typing": true }))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let message = app.send_message(&alice, chat_id, "over the wire").await;

    let mut buffer = String::new();
    let (name, data) = next_frame(&mut body, &mut buffer).await;
    assert_eq!(name, "new_message");
    assert_eq!(data["event_type"], "new_message");
    assert_eq!(data["payload"]["id"], message["id"]);
    assert_eq!(data["payload"]["content"], "over the wire");
    assert!(data["timestamp"].is_string());

    // Bob's own message and Alice reading it come next; the notification
    // Bob got for Alice's message never shows up
    app.send_message(&bob, chat_id, "got it").await;
    app.server
        .post(&format!("/api/chats/{}/read", chat_id))
        .authorization_bearer(&alice.token)
        .await
        .assert_status_ok();
    let (name, data) = next_frame(&mut body, &mut buffer).await;
    assert_eq!(name, "new_message");
    assert_eq!(data["payload"]["content"], "got it");
    let (name, data) = next_frame(&mut body, &mut buffer).await;
    assert_eq!(name, "messages_read");
    assert_eq!(data["payload"]["reader_id"], alice.id.to_string());

    drop(body);
    assert!(!app.state.rooms.is_online(bob.id));
}

#[tokio::test]
async fn test_unfiltered_stream_and_query_token() {
    let app = spawn_app().await;
    let alice = app.signup("alice").await;
    let bob = app.signup("bob").await;

    let request = Request::builder()
        .uri(format!("/realtime?access_token={}", bob.token))
        .body(Body::empty())
        .unwrap();
    let response = create_router(app.state.clone()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let mut body = response.into_body().into_data_stream();

    app.server
        .post("/api/friends/requests")
        .authorization_bearer(&alice.token)
        .json(&json!({ "to": "bob" }))
        .await
        .assert_status(StatusCode::CREATED);

    let mut buffer = String::new();
    let (first, data) = next_frame(&mut body, &mut buffer).await;
    assert_eq!(first, "friend_request_received");
    assert_eq!(data["payload"]["from_username"], "alice");
    let (second, _) = next_frame(&mut body, &mut buffer).await;
    assert_eq!(second, "notification");
}
