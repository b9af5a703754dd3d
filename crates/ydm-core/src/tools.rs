//! Discovery of the external FFmpeg and yt-dlp binaries.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Well-known install locations tried after `PATH`.
#[cfg(windows)]
const FFMPEG_FALLBACKS: &[&str] = &[
    r"C:\ffmpeg\bin\ffmpeg.exe",
    r"C:\Program Files\ffmpeg\bin\ffmpeg.exe",
    r"C:\Tools\ffmpeg\bin\ffmpeg.exe",
];
#[cfg(target_os = "macos")]
const FFMPEG_FALLBACKS: &[&str] = &["/opt/homebrew/bin/ffmpeg", "/usr/local/bin/ffmpeg"];
#[cfg(all(unix, not(target_os = "macos")))]
const FFMPEG_FALLBACKS: &[&str] = &["/usr/bin/ffmpeg", "/usr/local/bin/ffmpeg"];

fn version_output(program: &Path, flag: &str) -> Option<String> {
    let out = Command::new(program)
        .arg(flag)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&out.stdout).into_owned())
}

/// True if `program -version` identifies itself as FFmpeg.
pub fn verify_ffmpeg(program: &Path) -> bool {
    version_output(program, "-version").is_some_and(|s| s.contains("ffmpeg version"))
}

/// Finds a working FFmpeg: `custom` first, then `ffmpeg` on `PATH`, then
/// platform install locations.
pub fn find_ffmpeg(custom: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = custom {
        if verify_ffmpeg(path) {
            tracing::info!(path = %path.display(), "using configured FFmpeg");
            return Some(path.to_path_buf());
        }
        tracing::warn!(path = %path.display(), "configured FFmpeg is not usable");
    }
    let on_path = PathBuf::from("ffmpeg");
    if verify_ffmpeg(&on_path) {
        tracing::info!("using FFmpeg from PATH");
        return Some(on_path);
    }
    let found = FFMPEG_FALLBACKS
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists() && verify_ffmpeg(p));
    match &found {
        Some(p) => tracing::info!(path = %p.display(), "using FFmpeg"),
        None => tracing::error!("FFmpeg not found; merging and audio conversion will fail"),
    }
    found
}

/// Version string reported by the extractor binary, e.g. `2024.08.06`.
pub fn ytdlp_version(program: &Path) -> Option<String> {
    version_output(program, "--version")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
