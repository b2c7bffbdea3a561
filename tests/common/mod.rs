//! Shared fixtures for the black-box API tests

use axum_test::TestServer;
use threadboard::config::Limits;
use threadboard::rooms::RoomRegistry;
use threadboard::routes::create_router;
use threadboard::server::AppState;
use threadboard::service::ForumService;
use threadboard::store;

/// Spin up the full application over a fresh in-memory database.
pub async fn test_server() -> TestServer {
    test_server_with_limits(Limits::default()).await
}

/// Same, with custom field limits.
pub async fn test_server_with_limits(limits: Limits) -> TestServer {
    let pool = store::connect_memory().await.expect("in-memory pool");
    store::run_migrations(&pool).await.expect("migrations");

    let state = AppState {
        service: ForumService::new(pool, limits),
        rooms: RoomRegistry::new(),
    };
    TestServer::new(create_router(state)).expect("test server")
}
