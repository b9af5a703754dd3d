use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Preview generation and janitor parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreviewConfig {
    /// Length of generated previews in seconds.
    pub duration_secs: u32,
    /// Maximum video height for video previews.
    pub max_height: u32,
    /// Preview files older than this are removed by the janitor.
    pub max_age_secs: u64,
    /// How often the janitor sweeps the preview directory.
    pub sweep_interval_secs: u64,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            duration_secs: 30,
            max_height: 360,
            max_age_secs: 3600,
            sweep_interval_secs: 3600,
        }
    }
}

impl PreviewConfig {
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

/// Global configuration loaded from `~/.config/ydm/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YdmConfig {
    /// Address the HTTP server binds to.
    pub bind: String,
    /// Flat directory receiving finished downloads (None = user's Downloads dir).
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
    /// Directory for generated previews (None = XDG cache dir).
    #[serde(default)]
    pub preview_dir: Option<PathBuf>,
    /// yt-dlp executable (None = `yt-dlp` on PATH).
    #[serde(default)]
    pub ytdlp_path: Option<PathBuf>,
    /// Custom FFmpeg binary, tried before PATH and platform locations.
    #[serde(default)]
    pub ffmpeg_path: Option<PathBuf>,
    /// Optional preview settings; if missing, built-in defaults are used.
    #[serde(default)]
    pub preview: Option<PreviewConfig>,
    /// How long shutdown waits for running jobs to settle after cancelling them.
    #[serde(default)]
    pub shutdown_grace_secs: Option<u64>,
}

impl Default for YdmConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:5000".to_string(),
            download_dir: None,
            preview_dir: None,
            ytdlp_path: None,
            ffmpeg_path: None,
            preview: None,
            shutdown_grace_secs: None,
        }
    }
}

impl YdmConfig {
    pub fn download_dir(&self) -> PathBuf {
        self.download_dir.clone().unwrap_or_else(|| {
            dirs::download_dir()
                .or_else(|| dirs::home_dir().map(|h| h.join("Downloads")))
                .unwrap_or_else(|| PathBuf::from("downloads"))
        })
    }

    pub fn preview_dir(&self) -> PathBuf {
        self.preview_dir.clone().unwrap_or_else(|| {
            xdg::BaseDirectories::with_prefix("ydm")
                .map(|x| x.get_cache_home().join("previews"))
                .unwrap_or_else(|_| PathBuf::from("previews"))
        })
    }

    pub fn ytdlp_path(&self) -> PathBuf {
        self.ytdlp_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("yt-dlp"))
    }

    pub fn preview(&self) -> PreviewConfig {
        self.preview.clone().unwrap_or_default()
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs.unwrap_or(10))
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("ydm")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<YdmConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = YdmConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

/// Load configuration from an explicit file.
pub fn load_from_path(path: &Path) -> Result<YdmConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let cfg: YdmConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
