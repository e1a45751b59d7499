//! Real-time delivery tests
//!
//! Most tests subscribe straight to a user's room; `stream_test` reads the
//! SSE body served by `/realtime`.

mod events_test;
mod stream_test;

use std::time::Duration;

use chatline::shared::RealtimeEvent;
use tokio::sync::broadcast::Receiver;

/// Everything delivered to the room so far, waiting briefly for stragglers
pub async fn drain(rx: &mut Receiver<RealtimeEvent>) -> Vec<RealtimeEvent> {
    let mut events = Vec::new();
    while let Ok(Ok(event)) = tokio::time::timeout(Duration::from_millis(100), rx.recv()).await {
        events.push(event);
    }
    events
}
