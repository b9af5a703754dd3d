//! Route table.

mod downloads;
mod files;
mod media;

use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use super::AppState;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/info", post(media::info))
        .route("/api/preview", post(media::preview))
        .route("/api/download", post(downloads::start))
        .route("/api/progress/{id}", get(downloads::progress))
        .route("/api/download/{id}/{action}", post(downloads::control))
        .route("/download/{file}", get(files::serve_artifact))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
