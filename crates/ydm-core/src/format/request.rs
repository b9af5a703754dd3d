//! Download request resolution into extractor options.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::extractor::{ExtractOptions, PostProcess};
use crate::url_model::is_valid_media_url;

use super::Resolution;

/// Codec and bitrate for audio-only downloads.
const AUDIO_CODEC: &str = "mp3";
const AUDIO_QUALITY: &str = "320K";
/// Container that separate video and audio streams are merged into.
const MERGE_CONTAINER: &str = "mp4";

/// A request rejected before any job exists.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidRequest {
    #[error("invalid media URL: {0:?}")]
    Url(String),
    #[error("unknown quality {0:?}")]
    Quality(String),
}

/// Audio-only or audio+video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Audio,
    #[default]
    Video,
}

/// What a client asks to download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadRequest {
    pub url: String,
    #[serde(rename = "type", default)]
    pub kind: MediaKind,
    /// Resolution label for video requests ("720p", "4K", ...).
    #[serde(default)]
    pub quality: Option<String>,
}

impl DownloadRequest {
    pub fn audio(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: MediaKind::Audio,
            quality: None,
        }
    }

    pub fn video(url: impl Into<String>, quality: Option<&str>) -> Self {
        Self {
            url: url.into(),
            kind: MediaKind::Video,
            quality: quality.map(str::to_string),
        }
    }

    /// Checks the locator shape and quality label without building options.
    pub fn validate(&self) -> Result<(), InvalidRequest> {
        if !is_valid_media_url(&self.url) {
            return Err(InvalidRequest::Url(self.url.clone()));
        }
        if self.kind == MediaKind::Video {
            self.resolution()?;
        }
        Ok(())
    }

    /// Requested resolution; only meaningful for video requests.
    pub fn resolution(&self) -> Result<Resolution, InvalidRequest> {
        match self.quality.as_deref() {
            None => Ok(Resolution::DEFAULT),
            Some(label) => Resolution::from_label(label)
                .ok_or_else(|| InvalidRequest::Quality(label.to_string())),
        }
    }

    /// Resolves the request into extractor options writing to `output_template`.
    pub fn to_options(
        &self,
        output_template: String,
        ffmpeg_location: Option<&Path>,
    ) -> Result<ExtractOptions, InvalidRequest> {
        self.validate()?;
        let options = match self.kind {
            MediaKind::Audio => ExtractOptions::new("bestaudio/best", output_template)
                .with_post_process(PostProcess::ExtractAudio {
                    codec: AUDIO_CODEC.to_string(),
                    quality: AUDIO_QUALITY.to_string(),
                }),
            MediaKind::Video => {
                let height = self.resolution()?.height();
                ExtractOptions::new(
                    format!("bestvideo[height={height}]+bestaudio/best"),
                    output_template,
                )
                .with_post_process(PostProcess::MergeOutput {
                    container: MERGE_CONTAINER.to_string(),
                })
            }
        };
        Ok(options.with_ffmpeg(ffmpeg_location.map(Path::to_path_buf)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

    #[test]
    fn audio_request_extracts_mp3() {
        let opts = DownloadRequest::audio(URL)
            .to_options("/dl/%(title)s_dl_1.%(ext)s".into(), None)
            .unwrap();
        assert_eq!(opts.format, "bestaudio/best");
        assert_eq!(
            opts.post_process,
            vec![PostProcess::ExtractAudio {
                codec: "mp3".into(),
                quality: "320K".into()
            }]
        );
        assert!(opts.no_playlist);
        assert!(opts.ffmpeg_location.is_none());
    }

    #[test]
    fn video_request_defaults_to_720p_and_merges_mp4() {
        let opts = DownloadRequest::video(URL, None)
            .to_options("t".into(), Some(Path::new("/usr/bin/ffmpeg")))
            .unwrap();
        assert_eq!(opts.format, "bestvideo[height=720]+bestaudio/best");
        assert_eq!(
            opts.post_process,
            vec![PostProcess::MergeOutput {
                container: "mp4".into()
            }]
        );
        assert_eq!(
            opts.ffmpeg_location.as_deref(),
            Some(Path::new("/usr/bin/ffmpeg"))
        );
    }

    #[test]
    fn video_request_uses_label_height() {
        let opts = DownloadRequest::video(URL, Some("4K"))
            .to_options("t".into(), None)
            .unwrap();
        assert_eq!(opts.format, "bestvideo[height=2160]+bestaudio/best");
    }

    #[test]
    fn rejects_bad_url_and_quality() {
        assert_eq!(
            DownloadRequest::audio("https://example.com/x").validate(),
            Err(InvalidRequest::Url("https://example.com/x".into()))
        );
        assert_eq!(
            DownloadRequest::video(URL, Some("999p")).validate(),
            Err(InvalidRequest::Quality("999p".into()))
        );
    }

    #[test]
    fn deserializes_route_payload() {
        let req: DownloadRequest =
            serde_json::from_str(&format!(r#"{{"url":"{URL}","type":"audio"}}"#)).unwrap();
        assert_eq!(req.kind, MediaKind::Audio);
        assert!(req.quality.is_none());
        let req: DownloadRequest = serde_json::from_str(&format!(
            r#"{{"url":"{URL}","type":"video","quality":"1080p"}}"#
        ))
        .unwrap();
        assert_eq!(req.resolution(), Ok(Resolution::P1080));
    }
}
