//! Room membership and fan-out
//!
//! A room is the ephemeral set of connections subscribed to one thread.
//! Each room owns a `tokio::sync::broadcast` channel: publication order
//! is preserved per receiver, and a slow receiver lags on its own bounded
//! ring buffer without ever backpressuring the sender. Rooms are created
//! lazily on first join and dropped when the last member leaves; nothing
//! here survives a restart.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;
use uuid::Uuid;

use crate::shared::event::RoomEvent;

/// Capacity of each room's broadcast ring buffer.
const ROOM_CHANNEL_CAPACITY: usize = 256;

/// Opaque handle identifying one subscriber connection.
pub type ConnId = Uuid;

struct Room {
    tx: broadcast::Sender<RoomEvent>,
    /// Member connections and the display name each declared on join.
    members: HashMap<ConnId, String>,
}

/// Registry of live rooms, keyed by thread id.
///
/// Cloning shares the underlying map; the registry is handed to every
/// handler through application state.
#[derive(Clone, Default)]
pub struct RoomRegistry {
    rooms: Arc<Mutex<HashMap<i64, Room>>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection to a thread's room.
    ///
    /// Returns a receiver for the room's events, subscribed before the
    /// join notice is published so the joiner observes its own arrival.
    /// A join from a connection that is already a member is a no-op and
    /// returns `None`.
    pub fn join(
        &self,
        thread_id: i64,
        conn: ConnId,
        username: &str,
    ) -> Option<broadcast::Receiver<RoomEvent>> {
        let mut rooms = self.rooms.lock().unwrap();
        let room = rooms.entry(thread_id).or_insert_with(|| Room {
            tx: broadcast::channel(ROOM_CHANNEL_CAPACITY).0,
            members: HashMap::new(),
        });

        if room.members.contains_key(&conn) {
            return None;
        }

        let rx = room.tx.subscribe();
        room.members.insert(conn, username.to_string());
        let _ = room
            .tx
            .send(RoomEvent::status(format!("{username} joined thread {thread_id}")));
        tracing::debug!(thread_id, members = room.members.len(), "connection joined room");
        Some(rx)
    }

    /// Remove a connection from a room, notifying the remaining members.
    ///
    /// Returns the username recorded at join time; a leave from a
    /// connection that is not a member is a no-op returning `None`.
    pub fn leave(&self, thread_id: i64, conn: ConnId) -> Option<String> {
        let mut rooms = self.rooms.lock().unwrap();
        let room = rooms.get_mut(&thread_id)?;
        let username = room.members.remove(&conn)?;

        if room.members.is_empty() {
            rooms.remove(&thread_id);
        } else {
            let _ = room
                .tx
                .send(RoomEvent::status(format!("{username} left thread {thread_id}")));
        }
        tracing::debug!(thread_id, "connection left room");
        Some(username)
    }

    /// Deliver an event to every connection currently in the room.
    ///
    /// Returns the number of receivers the event reached; a nonexistent
    /// room is a no-op. Delivery never fails and never blocks: a dead or
    /// lagging receiver is its own consuming task's problem.
    pub fn broadcast(&self, thread_id: i64, event: RoomEvent) -> usize {
        let rooms = self.rooms.lock().unwrap();
        match rooms.get(&thread_id) {
            Some(room) => room.tx.send(event).unwrap_or(0),
            None => 0,
        }
    }

    /// Remove a connection from every room it joined, as if it had sent
    /// an explicit leave for each. Returns the rooms it was removed from
    /// with the username it carried there.
    pub fn disconnect(&self, conn: ConnId) -> Vec<(i64, String)> {
        let mut rooms = self.rooms.lock().unwrap();
        let mut left = Vec::new();

        rooms.retain(|&thread_id, room| {
            let Some(username) = room.members.remove(&conn) else {
                return true;
            };
            if !room.members.is_empty() {
                let _ = room
                    .tx
                    .send(RoomEvent::status(format!("{username} left thread {thread_id}")));
            }
            left.push((thread_id, username));
            !room.members.is_empty()
        });

        left
    }

    /// Number of members currently in a thread's room.
    pub fn member_count(&self, thread_id: i64) -> usize {
        let rooms = self.rooms.lock().unwrap();
        rooms.get(&thread_id).map_or(0, |room| room.members.len())
    }
}
