//! `ydm info` – print metadata and available formats.

use anyhow::{bail, Result};
use ydm_core::config::YdmConfig;
use ydm_core::url_model::is_valid_media_url;

pub async fn run_info(cfg: &YdmConfig, url: String) -> Result<()> {
    if !is_valid_media_url(&url) {
        bail!("invalid media URL: {}", url);
    }
    let extractor = super::extractor(cfg);
    let info = tokio::task::spawn_blocking(move || extractor.probe(&url)).await??;

    println!("{}  ({})", info.title, info.id);
    if let Some(secs) = info.duration {
        let secs = secs.round() as u64;
        println!("Duration: {}:{:02}", secs / 60, secs % 60);
    }
    if info.video_formats.is_empty() {
        println!("No video formats.");
    } else {
        println!("{:<8} {:<8} {:<6} {:>6} {:>12}", "QUALITY", "ID", "EXT", "FPS", "SIZE");
        for v in &info.video_formats {
            println!(
                "{:<8} {:<8} {:<6} {:>6} {:>12}",
                v.resolution,
                v.id,
                v.ext,
                v.fps.map(|f| format!("{f:.0}")).unwrap_or_else(|| "-".into()),
                size(v.filesize)
            );
        }
    }
    if !info.audio_formats.is_empty() {
        println!("{:<8} {:<8} {:<6} {:>12}", "BITRATE", "ID", "EXT", "SIZE");
        for a in &info.audio_formats {
            println!(
                "{:<8} {:<8} {:<6} {:>12}",
                a.bitrate,
                a.id,
                a.ext,
                size(a.filesize)
            );
        }
    }
    Ok(())
}

fn size(bytes: Option<u64>) -> String {
    match bytes {
        Some(b) => format!("{:.1} MiB", b as f64 / 1_048_576.0),
        None => "-".to_string(),
    }
}
