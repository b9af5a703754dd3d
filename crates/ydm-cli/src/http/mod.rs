//! HTTP surface for `ydm serve`.
//!
//! - `/health`
//! - `/api/info`, `/api/preview` (blocking extractor calls, run off the runtime)
//! - `/api/download`, `/api/progress/{id}`, `/api/download/{id}/{action}`
//! - `/preview/{file}` and `/download/{file}` for produced files

mod error;
mod routes;
mod state;

pub use error::ApiError;
pub use state::AppState;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Builds the application router with permissive CORS and request tracing.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let previews = ServeDir::new(&state.preview_dir);

    Router::new()
        .merge(routes::api_routes())
        .nest_service("/preview", previews)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
