//! Job creation, progress polling and control.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};
use ydm_core::format::DownloadRequest;
use ydm_core::job::ProgressSnapshot;

use crate::http::{ApiError, AppState};

pub async fn start(
    State(state): State<AppState>,
    payload: Result<Json<DownloadRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = payload?;
    let id = state.manager.create(&request)?;
    Ok(Json(json!({ "id": id })))
}

/// Never fails: untracked ids report as completed.
pub async fn progress(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<ProgressSnapshot> {
    Json(state.manager.get_progress(&id))
}

pub async fn control(
    State(state): State<AppState>,
    Path((id, action)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let manager = &state.manager;
    if manager.job(&id).is_none() {
        return Err(ApiError::NotFound("Download not found".into()));
    }
    match action.as_str() {
        "pause" => manager.pause(&id)?,
        "resume" => manager.resume(&id)?,
        "cancel" => {
            // Cancel scans and deletes partial files.
            let manager = manager.clone();
            tokio::task::spawn_blocking(move || manager.cancel(&id)).await??
        }
        _ => return Err(ApiError::BadRequest("Invalid action".into())),
    }
    Ok(Json(json!({ "status": "success" })))
}
