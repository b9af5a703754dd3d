//! CLI for the YDM media download manager.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use ydm_core::config;

use commands::{run_download, run_info, run_preview, run_serve, run_tools};

/// Top-level CLI for the YDM media download manager.
#[derive(Debug, Parser)]
#[command(name = "ydm")]
#[command(
    about = "YDM: audio/video downloads, previews and progress tracking over yt-dlp",
    long_about = None
)]
pub struct Cli {
    /// Load configuration from this file instead of ~/.config/ydm/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Start the HTTP server.
    Serve {
        /// Address to listen on (overrides `bind` in config).
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,
        /// Directory receiving finished downloads.
        #[arg(long, value_name = "DIR")]
        download_dir: Option<PathBuf>,
    },

    /// Show title and available formats for a URL.
    Info {
        /// Media page URL.
        url: String,
    },

    /// Download one URL in the foreground, printing progress. Ctrl-C cancels.
    Download {
        /// Media page URL.
        url: String,
        /// Audio only (mp3).
        #[arg(long)]
        audio: bool,
        /// Video resolution: 144p, 240p, 360p, 480p, 720p, 1080p, 1440p, 4K, 8K.
        #[arg(long, value_name = "LABEL", conflicts_with = "audio")]
        quality: Option<String>,
        /// Directory receiving the file.
        #[arg(long, value_name = "DIR")]
        download_dir: Option<PathBuf>,
    },

    /// Generate a short preview clip and print its path.
    Preview {
        /// Media page URL.
        url: String,
        /// Audio-only preview.
        #[arg(long)]
        audio: bool,
    },

    /// Show detected FFmpeg and yt-dlp.
    Tools,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = match &cli.config {
            Some(path) => config::load_from_path(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Serve { bind, download_dir } => {
                run_serve(&cfg, bind, download_dir).await?
            }
            CliCommand::Info { url } => run_info(&cfg, url).await?,
            CliCommand::Download {
                url,
                audio,
                quality,
                download_dir,
            } => run_download(&cfg, url, audio, quality, download_dir).await?,
            CliCommand::Preview { url, audio } => run_preview(&cfg, url, audio).await?,
            CliCommand::Tools => run_tools(&cfg).await?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
