//! Server entry point for `threadboard-server`.

use threadboard::config::AppConfig;
use threadboard::server::create_app;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let config = AppConfig::load();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if config.debug {
            "debug".to_string()
        } else {
            "info".to_string()
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    let app = create_app(&config).await?;

    let addr = config.bind_addr();
    tracing::info!("starting server on http://{} (debug={})", addr, config.debug);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
