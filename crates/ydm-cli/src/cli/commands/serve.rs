//! `ydm serve` – run the HTTP server until Ctrl-C.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use ydm_core::config::{PreviewConfig, YdmConfig};
use ydm_core::preview::sweep_expired;

use crate::http::{self, AppState};

pub async fn run_serve(
    cfg: &YdmConfig,
    bind: Option<String>,
    download_dir: Option<PathBuf>,
) -> Result<()> {
    let extractor = super::extractor(cfg);
    let manager = super::manager(cfg, Arc::clone(&extractor), download_dir)?;

    let preview_dir = cfg.preview_dir();
    std::fs::create_dir_all(&preview_dir)
        .with_context(|| format!("create preview directory {}", preview_dir.display()))?;
    let janitor = spawn_preview_janitor(preview_dir.clone(), cfg.preview());

    let state = AppState {
        manager: manager.clone(),
        extractor,
        preview_dir,
        preview: cfg.preview(),
    };

    let addr = bind.unwrap_or_else(|| cfg.bind.clone());
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("bind {}", addr))?;
    let local = listener.local_addr()?;
    tracing::info!("listening on http://{}", local);
    println!("ydm listening on http://{}", local);

    axum::serve(listener, http::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server")?;

    janitor.abort();
    let grace = cfg.shutdown_grace();
    let drained = tokio::task::spawn_blocking(move || manager.shutdown(grace)).await?;
    if drained {
        tracing::info!("shutdown complete");
    } else {
        tracing::warn!("shutdown grace period elapsed with downloads still running");
    }
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("interrupt received, shutting down"),
        Err(e) => tracing::error!("listen for ctrl-c: {}", e),
    }
}

/// Removes expired previews every `sweep_interval`. Errors are logged and
/// the next sweep still runs.
fn spawn_preview_janitor(dir: PathBuf, settings: PreviewConfig) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(settings.sweep_interval());
        loop {
            ticker.tick().await;
            let dir = dir.clone();
            let max_age = settings.max_age();
            match tokio::task::spawn_blocking(move || sweep_expired(&dir, max_age)).await {
                Ok(Ok(0)) => {}
                Ok(Ok(n)) => tracing::info!("preview janitor removed {} file(s)", n),
                Ok(Err(e)) => tracing::error!("preview cleanup: {}", e),
                Err(e) => tracing::error!("preview cleanup task: {}", e),
            }
        }
    })
}
