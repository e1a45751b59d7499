/**
 * Real-time Subscription Handler
 *
 * `GET /realtime` streams the caller's room as Server-Sent Events. The SSE
 * event name is the event type and the data is the JSON envelope
 * `{event_type, payload, timestamp}`.
 *
 * # Event Filtering
 *
 * Clients can filter events by type using the `types` query parameter:
 * - `?types=new_message,typing` - only messages and typing indicators
 * - No parameter - every event type
 *
 * Unknown type names are rejected with 400.
 *
 * # Connection Management
 *
 * - The stream counts as a live connection for presence until it closes
 * - Keep-alive comments hold idle connections open
 * - Lagged receivers skip the missed events and keep streaming
 */

use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures_util::stream;
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;

use crate::backend::error::BackendResult;
use crate::backend::middleware::AuthUser;
use crate::backend::realtime::presence;
use crate::backend::server::state::AppState;
use crate::shared::{EventType, SharedError};

#[derive(Debug, Default, Deserialize)]
pub struct RealtimeQuery {
    /// Comma-separated event type names
    pub types: Option<String>,
}

/// Parse the `types` filter. `None` means every type.
pub fn parse_type_filter(types: Option<&str>) -> Result<Option<Vec<EventType>>, SharedError> {
    let Some(types) = types else {
        return Ok(None);
    };

    let mut filter = Vec::new();
    for name in types.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let event_type: EventType = name.parse()?;
        if !filter.contains(&event_type) {
            filter.push(event_type);
        }
    }

    Ok(if filter.is_empty() { None } else { Some(filter) })
}

/// Handle real-time subscription (GET /realtime)
///
/// # Example Response
///
/// ```http
/// HTTP/1.1 200 OK
/// Content-Type: text/event-stream
///
/// event: new_message
/// data: {"event_type":"new_message","payload":{...},"timestamp":"..."}
/// ```
pub async fn handle_realtime_subscription(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<RealtimeQuery>,
) -> BackendResult<Sse<impl tokio_stream::Stream<Item = Result<Event, axum::Error>>>> {
    let filter = parse_type_filter(query.types.as_deref())?;

    match &filter {
        Some(types) => tracing::info!("[Realtime] {} subscribed to {:?}", user.username, types),
        None => tracing::info!("[Realtime] {} subscribed to all events", user.username),
    }

    let (rx, guard) = presence::connect(&state, user.user_id).await;

    // The guard lives inside the stream state, so the connection stays
    // counted until the client goes away.
    let stream = stream::unfold((rx, filter, guard), |(mut rx, filter, guard)| async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    if let Some(types) = &filter {
                        if !types.contains(&event.event_type) {
                            continue;
                        }
                    }

                    let data = match serde_json::to_string(&event) {
                        Ok(data) => data,
                        Err(e) => {
                            tracing::error!("[Realtime] Failed to serialize event: {:?}", e);
                            continue;
                        }
                    };

                    tracing::debug!("[Realtime] Sending {} to {}", event.event_type.as_str(), guard.user_id());
                    let sse_event = Event::default().event(event.event_type.as_str()).data(data);
                    return Some((Ok(sse_event), (rx, filter, guard)));
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("[Realtime] {} lagged, skipped {} events", guard.user_id(), skipped);
                    continue;
                }
                Err(RecvError::Closed) => {
                    tracing::warn!("[Realtime] Room closed for {}, ending stream", guard.user_id());
                    return None;
                }
            }
        }
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
