//! Short preview clips and the janitor that expires them.

use std::fs;
use std::io;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use thiserror::Error;

use crate::config::PreviewConfig;
use crate::extractor::{ExtractError, ExtractOptions, Extractor, ProgressEvent};
use crate::format::{InvalidRequest, MediaKind};
use crate::url_model::is_valid_media_url;

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error(transparent)]
    Validation(#[from] InvalidRequest),
    #[error("preview failed: {0}")]
    Extract(#[from] ExtractError),
    #[error("preview produced no file")]
    Unnamed,
}

/// Format selector for a preview of the given kind.
fn preview_format(kind: MediaKind, max_height: u32) -> String {
    match kind {
        MediaKind::Audio => "bestaudio/best".to_string(),
        MediaKind::Video => format!("bestvideo[height<={max_height}]"),
    }
}

/// Downloads the first `duration_secs` of `url` into `dir` and returns the
/// produced file name (relative to `dir`).
pub fn generate_preview(
    extractor: &dyn Extractor,
    url: &str,
    kind: MediaKind,
    dir: &Path,
    settings: &PreviewConfig,
    ffmpeg: Option<&Path>,
) -> Result<String, PreviewError> {
    if !is_valid_media_url(url) {
        return Err(InvalidRequest::Url(url.to_string()).into());
    }
    fs::create_dir_all(dir).map_err(ExtractError::Io)?;

    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let prefix = format!("preview_{stamp}_");
    let template = dir.join(format!("{prefix}%(id)s.%(ext)s"));
    let options = ExtractOptions::new(
        preview_format(kind, settings.max_height),
        template.to_string_lossy(),
    )
    .with_clip(settings.duration_secs)
    .with_ffmpeg(ffmpeg.map(Path::to_path_buf));

    tracing::info!(url, ?kind, "generating preview");
    let extracted = extractor.extract(url, &options, &mut |event: ProgressEvent| {
        tracing::debug!(status = ?event.status, percent = ?event.percent, "preview progress");
        Ok(())
    })?;

    let reported = extracted
        .filename
        .as_deref()
        .and_then(|f| Path::new(f).file_name())
        .and_then(|n| n.to_str())
        .map(str::to_string);
    let name = match reported {
        Some(n) => n,
        None => find_with_prefix(dir, &prefix).ok_or(PreviewError::Unnamed)?,
    };
    tracing::info!(file = %name, "preview ready");
    Ok(name)
}

fn find_with_prefix(dir: &Path, prefix: &str) -> Option<String> {
    fs::read_dir(dir)
        .ok()?
        .filter_map(Result::ok)
        .filter_map(|e| e.file_name().into_string().ok())
        .find(|n| n.starts_with(prefix) && !n.ends_with(".part"))
}

/// Removes regular files in `dir` last modified more than `max_age` ago.
/// Returns how many were removed. Per-file errors are logged and skipped.
pub fn sweep_expired(dir: &Path, max_age: Duration) -> io::Result<usize> {
    let now = SystemTime::now();
    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let meta = match entry.metadata() {
            Ok(m) if m.is_file() => m,
            Ok(_) => continue,
            Err(e) => {
                tracing::warn!(path = %entry.path().display(), "stat failed: {}", e);
                continue;
            }
        };
        let age = meta
            .modified()
            .ok()
            .and_then(|m| now.duration_since(m).ok())
            .unwrap_or_default();
        if age <= max_age {
            continue;
        }
        match fs::remove_file(entry.path()) {
            Ok(()) => {
                tracing::info!(path = %entry.path().display(), "removed old preview file");
                removed += 1;
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = %entry.path().display(), "remove failed: {}", e),
        }
    }
    Ok(removed)
}
