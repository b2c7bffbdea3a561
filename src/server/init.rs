//! Server initialization
//!
//! Initialization order: open the database (creating the data directory
//! and file on first run), apply migrations, assemble the application
//! state, configure routes. Failures here are fatal; the server has
//! nothing useful to do without its store.

use axum::Router;

use crate::config::AppConfig;
use crate::rooms::RoomRegistry;
use crate::routes::create_router;
use crate::server::state::AppState;
use crate::service::ForumService;
use crate::store;

/// Build the application router from loaded configuration.
pub async fn create_app(config: &AppConfig) -> Result<Router, Box<dyn std::error::Error>> {
    ensure_sqlite_dir(&config.database_url);

    tracing::info!("connecting to {}", config.database_url);
    let pool = store::connect(&config.database_url).await?;
    store::run_migrations(&pool).await?;
    tracing::info!("database ready");

    let state = AppState {
        service: ForumService::new(pool, config.limits.clone()),
        rooms: RoomRegistry::new(),
    };
    Ok(create_router(state))
}

/// Create the parent directory for a file-backed sqlite URL so the first
/// run works from a clean checkout.
fn ensure_sqlite_dir(database_url: &str) {
    let Some(path) = database_url.strip_prefix("sqlite://") else {
        return;
    };
    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!("could not create database directory: {}", e);
            }
        }
    }
}
