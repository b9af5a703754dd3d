use std::path::PathBuf;

/// Post-processing applied after the transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostProcess {
    /// Convert to an audio-only file.
    ExtractAudio { codec: String, quality: String },
    /// Merge separate video/audio streams into one container.
    MergeOutput { container: String },
}

/// Configuration bag handed to the extractor. Immutable once a job exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Format selector, e.g. `bestaudio/best`.
    pub format: String,
    /// Output path template, e.g. `/dl/%(title)s_dl_1a2b3c4d.%(ext)s`.
    pub output_template: String,
    pub post_process: Vec<PostProcess>,
    /// Only fetch the first N seconds.
    pub clip_secs: Option<u32>,
    /// Treat playlist locators as a single item.
    pub no_playlist: bool,
    pub ffmpeg_location: Option<PathBuf>,
}

impl ExtractOptions {
    pub fn new(format: impl Into<String>, output_template: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            output_template: output_template.into(),
            post_process: Vec::new(),
            clip_secs: None,
            no_playlist: true,
            ffmpeg_location: None,
        }
    }

    pub fn with_post_process(mut self, step: PostProcess) -> Self {
        self.post_process.push(step);
        self
    }

    pub fn with_clip(mut self, secs: u32) -> Self {
        self.clip_secs = Some(secs);
        self
    }

    pub fn with_ffmpeg(mut self, location: Option<PathBuf>) -> Self {
        self.ffmpeg_location = location;
        self
    }
}
