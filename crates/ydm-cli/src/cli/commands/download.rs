//! `ydm download` – run a single job in the foreground.

use anyhow::{bail, Result};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use ydm_core::config::YdmConfig;
use ydm_core::format::DownloadRequest;
use ydm_core::job::JobStatus;

const PROGRESS_INTERVAL_MS: u64 = 500;

pub async fn run_download(
    cfg: &YdmConfig,
    url: String,
    audio: bool,
    quality: Option<String>,
    download_dir: Option<PathBuf>,
) -> Result<()> {
    let request = if audio {
        DownloadRequest::audio(url)
    } else {
        DownloadRequest::video(url, quality.as_deref())
    };
    let extractor = super::extractor(cfg);
    let manager = super::manager(cfg, extractor, download_dir)?;
    let job = manager.start(&request)?;
    println!("Started {}", job.id());

    let mut ticker = tokio::time::interval(Duration::from_millis(PROGRESS_INTERVAL_MS));
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let p = job.progress();
                print!(
                    "\r  {:5.1}%  {:>12}  ETA {:>8}  [{}]   ",
                    p.percent, p.speed, p.eta, p.status
                );
                let _ = std::io::stdout().flush();
                if job.is_settled() {
                    break;
                }
            }
            _ = &mut ctrl_c => {
                println!();
                tracing::info!(job_id = %job.id(), "interrupt received, cancelling");
                let _ = manager.cancel(job.id().as_str());
                let waiting = Arc::clone(&job);
                let grace = cfg.shutdown_grace();
                tokio::task::spawn_blocking(move || waiting.wait_settled(grace)).await?;
                break;
            }
        }
    }
    println!();

    let p = job.progress();
    match p.status {
        JobStatus::Completed => {
            if let Some(path) = job.final_path() {
                println!("Saved {}", path.display());
            }
        }
        JobStatus::Cancelled => println!("Cancelled."),
        JobStatus::Error => bail!(
            "download failed: {}",
            p.message.as_deref().unwrap_or("unknown error")
        ),
        other => tracing::warn!(job_id = %job.id(), "left in state {}", other),
    }
    Ok(())
}
