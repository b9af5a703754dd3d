//! Metadata model built from the extractor's JSON probe output.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::Resolution;

/// One downloadable video quality, the best stream for a given resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoOption {
    pub id: String,
    pub resolution: String,
    pub height: u32,
    pub ext: String,
    pub filesize: Option<u64>,
    pub fps: Option<f64>,
}

/// One downloadable audio stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioOption {
    pub id: String,
    pub abr: f64,
    pub ext: String,
    pub filesize: Option<u64>,
    pub bitrate: String,
}

/// Title, duration and the qualities a client can choose from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaInfo {
    pub id: String,
    pub title: String,
    pub duration: Option<f64>,
    pub thumbnail: Option<String>,
    pub video_formats: Vec<VideoOption>,
    pub audio_formats: Vec<AudioOption>,
}

#[derive(Debug, Deserialize)]
struct ProbeDocument {
    id: String,
    title: String,
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default)]
    thumbnail: Option<String>,
    #[serde(default)]
    formats: Vec<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    format_id: String,
    #[serde(default)]
    ext: String,
    #[serde(default)]
    vcodec: Option<String>,
    #[serde(default)]
    acodec: Option<String>,
    #[serde(default)]
    height: Option<u32>,
    #[serde(default)]
    fps: Option<f64>,
    #[serde(default)]
    tbr: Option<f64>,
    #[serde(default)]
    abr: Option<f64>,
    #[serde(default)]
    asr: Option<f64>,
    #[serde(default)]
    filesize: Option<u64>,
}

impl ProbeFormat {
    fn has_video(&self) -> bool {
        self.vcodec.as_deref() != Some("none")
    }

    fn has_audio(&self) -> bool {
        self.acodec.as_deref() != Some("none")
    }
}

fn desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    b.unwrap_or(0.0).total_cmp(&a.unwrap_or(0.0))
}

impl MediaInfo {
    /// Parses `yt-dlp -J` output.
    pub fn from_probe_json(json: &[u8]) -> Result<Self, serde_json::Error> {
        let doc: ProbeDocument = serde_json::from_slice(json)?;
        Ok(Self::from_probe(doc))
    }

    fn from_probe(doc: ProbeDocument) -> Self {
        let video_formats = Resolution::ALL
            .iter()
            .filter_map(|res| {
                doc.formats
                    .iter()
                    .filter(|f| f.has_video() && f.height == Some(res.height()))
                    .max_by(|a, b| desc(b.tbr, a.tbr))
                    .map(|best| VideoOption {
                        id: best.format_id.clone(),
                        resolution: res.label().to_string(),
                        height: res.height(),
                        ext: best.ext.clone(),
                        filesize: best.filesize,
                        fps: best.fps,
                    })
            })
            .collect();

        let mut audio: Vec<&ProbeFormat> = doc
            .formats
            .iter()
            .filter(|f| f.has_audio() && f.abr.is_some())
            .collect();
        audio.sort_by(|a, b| desc(a.abr, b.abr).then_with(|| desc(a.asr, b.asr)));
        let audio_formats = audio
            .into_iter()
            .map(|f| {
                let abr = f.abr.unwrap_or_default();
                AudioOption {
                    id: f.format_id.clone(),
                    abr,
                    ext: f.ext.clone(),
                    filesize: f.filesize,
                    bitrate: format!("{abr}kbps"),
                }
            })
            .collect();

        MediaInfo {
            id: doc.id,
            title: doc.title,
            duration: doc.duration,
            thumbnail: doc.thumbnail,
            video_formats,
            audio_formats,
        }
    }
}
