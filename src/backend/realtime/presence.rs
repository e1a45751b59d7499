/**
 * Presence Tracking
 *
 * A user is online while at least one event stream of theirs is open.
 * Opening the first stream tells their friends they came online; closing
 * the last one stores `last_seen` and tells friends they went offline.
 */

use chrono::Utc;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::backend::auth::users::touch_last_seen;
use crate::backend::messaging::db::list_friend_ids;
use crate::backend::server::state::AppState;
use crate::shared::RealtimeEvent;

/// Keeps a live connection counted until dropped
pub struct PresenceGuard {
    state: AppState,
    user_id: Uuid,
}

impl PresenceGuard {
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }
}

impl Drop for PresenceGuard {
    fn drop(&mut self) {
        if !self.state.rooms.leave(self.user_id) {
            return;
        }

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let state = self.state.clone();
                let user_id = self.user_id;
                handle.spawn(async move { announce_offline(&state, user_id).await });
            }
            Err(_) => tracing::debug!("[Presence] No runtime to announce {} offline", self.user_id),
        }
    }
}

/// Join the user's room as a live connection
pub async fn connect(state: &AppState, user_id: Uuid) -> (broadcast::Receiver<RealtimeEvent>, PresenceGuard) {
    let (rx, first) = state.rooms.join(user_id);
    let guard = PresenceGuard {
        state: state.clone(),
        user_id,
    };

    if first {
        tracing::info!("[Presence] {} is online", user_id);
        announce(state, user_id, RealtimeEvent::presence(user_id, true, None)).await;
    }

    (rx, guard)
}

async fn announce_offline(state: &AppState, user_id: Uuid) {
    let now = Utc::now();
    if let Err(e) = touch_last_seen(&state.db, user_id, now).await {
        tracing::error!("[Presence] Failed to store last_seen for {}: {:?}", user_id, e);
    }

    // A new stream may have opened while last_seen was written
    if state.rooms.is_online(user_id) {
        return;
    }

    tracing::info!("[Presence] {} is offline", user_id);
    announce(state, user_id, RealtimeEvent::presence(user_id, false, Some(now))).await;
}

async fn announce(state: &AppState, user_id: Uuid, event: RealtimeEvent) {
    match list_friend_ids(&state.db, user_id).await {
        Ok(friends) => {
            state.rooms.emit_many(&friends, &event);
        }
        Err(e) => tracing::error!("[Presence] Failed to load friends of {}: {:?}", user_id, e),
    }
}
