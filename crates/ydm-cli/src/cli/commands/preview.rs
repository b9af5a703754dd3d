//! `ydm preview` – generate a preview clip.

use anyhow::{Context, Result};
use ydm_core::config::YdmConfig;
use ydm_core::format::MediaKind;
use ydm_core::preview::generate_preview;
use ydm_core::tools::find_ffmpeg;

pub async fn run_preview(cfg: &YdmConfig, url: String, audio: bool) -> Result<()> {
    let kind = if audio {
        MediaKind::Audio
    } else {
        MediaKind::Video
    };
    let extractor = super::extractor(cfg);
    let dir = cfg.preview_dir();
    let settings = cfg.preview();
    let custom_ffmpeg = cfg.ffmpeg_path.clone();

    let out_dir = dir.clone();
    let name = tokio::task::spawn_blocking(move || {
        let ffmpeg = find_ffmpeg(custom_ffmpeg.as_deref());
        generate_preview(
            extractor.as_ref(),
            &url,
            kind,
            &out_dir,
            &settings,
            ffmpeg.as_deref(),
        )
    })
    .await?
    .context("generate preview")?;

    println!("{}", dir.join(name).display());
    Ok(())
}
