/**
 * Per-User Event Rooms
 *
 * Every user owns one room keyed by their user id. A room is a
 * `tokio::sync::broadcast` channel plus the number of live connections
 * streaming from it. Handlers emit events into the rooms of the users they
 * affect; each open event stream of that user receives a copy.
 *
 * # Presence
 *
 * A user is online while their room has at least one live connection.
 * `join` reports the first connection and `leave` the last one, which is
 * what drives presence events.
 *
 * # Delivery
 *
 * Emitting into a room nobody listens to is a no-op. Slow receivers lag
 * and skip events once the channel capacity is exceeded.
 */

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;
use uuid::Uuid;

use crate::shared::messaging::UserProfile;
use crate::shared::RealtimeEvent;

/// Sending half of a user room
pub type RealtimeEventBroadcast = broadcast::Sender<RealtimeEvent>;

struct Room {
    sender: RealtimeEventBroadcast,
    connections: usize,
}

/// Registry of user rooms
#[derive(Clone)]
pub struct RoomRegistry {
    rooms: Arc<Mutex<HashMap<Uuid, Room>>>,
    capacity: usize,
}

impl RoomRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            rooms: Arc::new(Mutex::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, Room>> {
        self.rooms.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn room<'a>(&self, rooms: &'a mut HashMap<Uuid, Room>, user_id: Uuid) -> &'a mut Room {
        rooms.entry(user_id).or_insert_with(|| Room {
            sender: broadcast::channel(self.capacity).0,
            connections: 0,
        })
    }

    /// Listen to a room without counting as a live connection
    pub fn subscribe(&self, user_id: Uuid) -> broadcast::Receiver<RealtimeEvent> {
        let mut rooms = self.lock();
        self.room(&mut rooms, user_id).sender.subscribe()
    }

    /// Open a live connection. The flag is true for the user's first one.
    pub fn join(&self, user_id: Uuid) -> (broadcast::Receiver<RealtimeEvent>, bool) {
        let mut rooms = self.lock();
        let room = self.room(&mut rooms, user_id);
        room.connections += 1;
        (room.sender.subscribe(), room.connections == 1)
    }

    /// Close a live connection. Returns true when it was the user's last one.
    pub fn leave(&self, user_id: Uuid) -> bool {
        let mut rooms = self.lock();
        match rooms.get_mut(&user_id) {
            Some(room) if room.connections > 0 => {
                room.connections -= 1;
                room.connections == 0
            }
            _ => false,
        }
    }

    /// Emit an event into one user's room
    ///
    /// Returns the number of receivers that got it.
    pub fn emit(&self, user_id: Uuid, event: RealtimeEvent) -> usize {
        let sender = self.lock().get(&user_id).map(|room| room.sender.clone());
        match sender {
            Some(sender) => broadcast_event(&sender, event),
            None => {
                tracing::debug!("[Realtime] No room for {}, dropping {}", user_id, event.event_type.as_str());
                0
            }
        }
    }

    /// Emit the same event into several rooms
    pub fn emit_many(&self, user_ids: &[Uuid], event: &RealtimeEvent) -> usize {
        user_ids.iter().map(|user_id| self.emit(*user_id, event.clone())).sum()
    }

    /// Whether the user has at least one live connection
    pub fn is_online(&self, user_id: Uuid) -> bool {
        self.lock().get(&user_id).is_some_and(|room| room.connections > 0)
    }

    /// Set `is_online` on each profile from live connections
    pub fn fill_presence(&self, profiles: &mut [UserProfile]) {
        let rooms = self.lock();
        for profile in profiles {
            profile.is_online = rooms.get(&profile.id).is_some_and(|room| room.connections > 0);
        }
    }

    /// Drop rooms with no receivers and no live connections
    pub fn cleanup_inactive_rooms(&self) -> usize {
        let mut rooms = self.lock();
        let before = rooms.len();
        rooms.retain(|_, room| room.connections > 0 || room.sender.receiver_count() > 0);
        before - rooms.len()
    }

    pub fn room_count(&self) -> usize {
        self.lock().len()
    }
}

/// Send an event on a room channel
///
/// Returns the number of receivers that got it (0 when nobody listens).
pub fn broadcast_event(broadcast_tx: &RealtimeEventBroadcast, event: RealtimeEvent) -> usize {
    let name = event.event_type.as_str();
    match broadcast_tx.send(event) {
        Ok(subscriber_count) => {
            tracing::debug!("[Realtime] {} delivered to {} receivers", name, subscriber_count);
            subscriber_count
        }
        Err(_) => {
            tracing::debug!("[Realtime] No receivers for {}", name);
            0
        }
    }
}
