//! CompCleared Signup Server
//!
//! Serves the compiled signup front end. The backend API lives elsewhere and
//! is reached directly from the browser.

mod config;
mod routes;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    if !config.static_dir.join("index.html").is_file() {
        tracing::warn!(
            static_dir = %config.static_dir.display(),
            "index.html not found - build the front end first"
        );
    }

    let app = routes::router(&config.static_dir);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;

    tracing::info!("CompCleared signup server running on http://{}", config.bind_addr);
    tracing::info!("  GET  /health     - Health check");
    tracing::info!("  GET  /signup     - Plan selection and checkout");
    tracing::info!("  GET  /dashboard  - Post-signup landing");

    axum::serve(listener, app).await?;

    Ok(())
}
