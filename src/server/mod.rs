//! Server setup
//!
//! - **`state`** - the application state container and `FromRef` impls
//! - **`init`** - database + router assembly

/// Server initialization
pub mod init;

/// Application state
pub mod state;

pub use init::create_app;
pub use state::AppState;
