//! Metadata and preview endpoints. Both call the extractor synchronously, so
//! they run on the blocking pool.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use ydm_core::format::{MediaInfo, MediaKind};
use ydm_core::preview::generate_preview;
use ydm_core::url_model::is_valid_media_url;

use crate::http::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct InfoBody {
    url: String,
}

pub async fn info(
    State(state): State<AppState>,
    payload: Result<Json<InfoBody>, JsonRejection>,
) -> Result<Json<MediaInfo>, ApiError> {
    let Json(body) = payload?;
    if !is_valid_media_url(&body.url) {
        return Err(ApiError::BadRequest("Invalid media URL".into()));
    }
    tracing::info!(url = %body.url, "fetching info");
    let extractor = Arc::clone(&state.extractor);
    let info = tokio::task::spawn_blocking(move || extractor.probe(&body.url)).await??;
    Ok(Json(info))
}

#[derive(Debug, Deserialize)]
pub struct PreviewBody {
    url: String,
    #[serde(rename = "type", default)]
    kind: MediaKind,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    preview_url: String,
}

pub async fn preview(
    State(state): State<AppState>,
    payload: Result<Json<PreviewBody>, JsonRejection>,
) -> Result<Json<PreviewResponse>, ApiError> {
    let Json(body) = payload?;
    let extractor = Arc::clone(&state.extractor);
    let dir = state.preview_dir.clone();
    let settings = state.preview.clone();
    let ffmpeg = state.manager.settings().ffmpeg_location.clone();

    let name = tokio::task::spawn_blocking(move || {
        generate_preview(
            extractor.as_ref(),
            &body.url,
            body.kind,
            &dir,
            &settings,
            ffmpeg.as_deref(),
        )
    })
    .await??;
    Ok(Json(PreviewResponse {
        preview_url: format!("/preview/{name}"),
    }))
}
