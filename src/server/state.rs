//! Application state management
//!
//! `AppState` is the explicit context object: constructed once at
//! startup, cloned into every handler, no ambient singletons. The
//! `FromRef` impls let handlers extract just the part they need.

use axum::extract::FromRef;

use crate::rooms::RoomRegistry;
use crate::service::ForumService;

/// Central state container for the axum application.
#[derive(Clone)]
pub struct AppState {
    /// The validation + persistence core.
    pub service: ForumService,
    /// Per-thread pub/sub rooms.
    pub rooms: RoomRegistry,
}

impl FromRef<AppState> for ForumService {
    fn from_ref(state: &AppState) -> Self {
        state.service.clone()
    }
}

impl FromRef<AppState> for RoomRegistry {
    fn from_ref(state: &AppState) -> Self {
        state.rooms.clone()
    }
}
