//! `ydm tools` – report external tool discovery.

use anyhow::Result;
use ydm_core::config::YdmConfig;
use ydm_core::logging::log_file_path;
use ydm_core::tools::{find_ffmpeg, ytdlp_version};

pub async fn run_tools(cfg: &YdmConfig) -> Result<()> {
    let ytdlp = cfg.ytdlp_path();
    let custom = cfg.ffmpeg_path.clone();
    let (ffmpeg, version) = tokio::task::spawn_blocking({
        let ytdlp = ytdlp.clone();
        move || (find_ffmpeg(custom.as_deref()), ytdlp_version(&ytdlp))
    })
    .await?;

    match version {
        Some(v) => println!("yt-dlp: {} ({})", v, ytdlp.display()),
        None => println!("yt-dlp: not found ({})", ytdlp.display()),
    }
    match ffmpeg {
        Some(p) => println!("ffmpeg: {}", p.display()),
        None => println!("ffmpeg: not found (audio extraction and stream merging will fail)"),
    }
    if let Ok(log) = log_file_path() {
        println!("log:    {}", log.display());
    }
    Ok(())
}
