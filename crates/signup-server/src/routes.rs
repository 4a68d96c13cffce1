//! Router
//!
//! `/health` plus the static front end. Any path that is not a file falls
//! back to `index.html` so client-side routes such as the payment return
//! URL `/signup?session_id=...&company_id=...` load the app.

use std::path::Path;

use axum::{Json, Router, routing::get};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn router(static_dir: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let frontend =
        ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .route("/health", get(health_check))
        .fallback_service(frontend)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
