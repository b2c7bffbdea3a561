//! WebSocket gateway for the room subscribe layer
//!
//! Each socket carries JSON frames that parse into [`ClientEvent`]
//! commands. Commands are dispatched sequentially in arrival order, which
//! preserves per-sender message ordering end to end. Events fanned out by
//! the rooms a connection joined are funneled through a bounded
//! per-connection queue drained by a single writer task, so one slow
//! socket never stalls a room.
//!
//! This path is fire-and-forget by design: a frame that fails to parse,
//! names a missing thread, or violates a limit is dropped without a
//! reply. The room itself is the only acknowledgment channel.

use std::collections::HashMap;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::rooms::{ConnId, RoomRegistry};
use crate::service::ForumService;
use crate::shared::event::{ClientEvent, RoomEvent};
use crate::validate;

/// Capacity of the per-connection outbound queue.
const OUTBOUND_CAPACITY: usize = 64;

/// Gateway-side state for one connection.
struct ConnState {
    conn: ConnId,
    /// Per-room forward tasks copying room events into the outbound queue.
    forwards: HashMap<i64, JoinHandle<()>>,
    out_tx: mpsc::Sender<RoomEvent>,
}

/// Upgrade `GET /ws/chat` into a room subscription socket.
pub async fn chat_ws(
    State(service): State<ForumService>,
    State(rooms): State<RoomRegistry>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, service, rooms))
}

async fn handle_socket(socket: WebSocket, service: ForumService, rooms: RoomRegistry) {
    let conn: ConnId = Uuid::new_v4();
    let (mut sink, mut stream) = socket.split();
    let (out_tx, mut out_rx) = mpsc::channel::<RoomEvent>(OUTBOUND_CAPACITY);

    // Single writer: everything this connection sees goes through here.
    let mut writer = tokio::spawn(async move {
        while let Some(event) = out_rx.recv().await {
            let Ok(text) = serde_json::to_string(&event) else {
                continue;
            };
            if sink.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    let mut state = ConnState {
        conn,
        forwards: HashMap::new(),
        out_tx,
    };

    loop {
        tokio::select! {
            frame = stream.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        let Ok(event) = serde_json::from_str::<ClientEvent>(&text) else {
                            tracing::debug!(%conn, "dropping unparseable frame");
                            continue;
                        };
                        dispatch(&service, &rooms, &mut state, event).await;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {} // ping/pong/binary: nothing to do
                    Some(Err(_)) => break,
                }
            }
            // The socket died mid-write; stop reading too.
            _ = &mut writer => break,
        }
    }

    // Implicit leave from every joined room.
    for (_, handle) in state.forwards.drain() {
        handle.abort();
    }
    let left = rooms.disconnect(conn);
    if !left.is_empty() {
        tracing::debug!(%conn, rooms = left.len(), "connection swept from rooms");
    }
    writer.abort();
}

/// Apply one inbound command against the service and the room registry.
async fn dispatch(
    service: &ForumService,
    rooms: &RoomRegistry,
    state: &mut ConnState,
    event: ClientEvent,
) {
    match event {
        ClientEvent::Join { thread_id, username } => {
            let username = display_name(username.as_deref());
            let Some(rx) = rooms.join(thread_id, state.conn, &username) else {
                return; // already a member
            };
            let handle = spawn_forward(thread_id, rx, state.out_tx.clone());
            if let Some(previous) = state.forwards.insert(thread_id, handle) {
                previous.abort();
            }
        }
        ClientEvent::Leave { thread_id } => {
            // Drop the forward task first so the leaver does not observe
            // its own departure notice.
            if let Some(handle) = state.forwards.remove(&thread_id) {
                handle.abort();
            }
            rooms.leave(thread_id, state.conn);
        }
        ClientEvent::SendMessage {
            thread_id,
            username,
            content,
        } => match service
            .post_message(thread_id, username.as_deref(), &content)
            .await
        {
            Ok(post) => {
                rooms.broadcast(thread_id, RoomEvent::new_post(post));
            }
            Err(err) => {
                // No error channel on this path; invalid input is a no-op.
                tracing::debug!(thread_id, %err, "dropping invalid send_message event");
            }
        },
    }
}

/// Copy one room's events into the connection's outbound queue.
fn spawn_forward(
    thread_id: i64,
    mut rx: broadcast::Receiver<RoomEvent>,
    out_tx: mpsc::Sender<RoomEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    if out_tx.send(event).await.is_err() {
                        break;
                    }
                }
                // Fell behind the room's ring buffer: skip the missed
                // events and keep consuming.
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(thread_id, skipped, "room subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

/// Display name declared on join; not persisted, so only trimmed and
/// defaulted, never length-checked.
fn display_name(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => validate::ANONYMOUS.to_string(),
    }
}
