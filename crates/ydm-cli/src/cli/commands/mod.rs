//! CLI command handlers. Each command is in its own file.

mod download;
mod info;
mod preview;
mod serve;
mod tools;

pub use download::run_download;
pub use info::run_info;
pub use preview::run_preview;
pub use serve::run_serve;
pub use tools::run_tools;

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use ydm_core::config::YdmConfig;
use ydm_core::extractor::{Extractor, YtDlp};
use ydm_core::job::{JobManager, ManagerSettings};
use ydm_core::tools::find_ffmpeg;

fn extractor(cfg: &YdmConfig) -> Arc<dyn Extractor> {
    Arc::new(YtDlp::new(cfg.ytdlp_path()))
}

/// Builds the job manager from config, probing for FFmpeg.
fn manager(
    cfg: &YdmConfig,
    extractor: Arc<dyn Extractor>,
    download_dir: Option<PathBuf>,
) -> Result<JobManager> {
    let settings = ManagerSettings {
        download_dir: download_dir.unwrap_or_else(|| cfg.download_dir()),
        ffmpeg_location: find_ffmpeg(cfg.ffmpeg_path.as_deref()),
    };
    tracing::debug!(
        download_dir = %settings.download_dir.display(),
        ffmpeg = ?settings.ffmpeg_location,
        "job manager settings"
    );
    JobManager::new(extractor, settings)
}
