//! Scripted extractor for integration tests.
//!
//! Renders the output template with a fixed title, writes a `.part` file,
//! emits color-decorated progress callbacks and renames the part to the
//! final name on success. Can be held at a gate, before or after the part
//! file exists, and told to fail.

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex};
use std::time::Duration;

use ydm_core::extractor::{
    ExtractError, ExtractOptions, Extracted, Extractor, HookResult, ProgressEvent,
};
use ydm_core::format::MediaInfo;

/// One-shot latch: closed until `open` is called.
#[derive(Default)]
pub struct Gate {
    open: Mutex<bool>,
    cv: Condvar,
}

impl Gate {
    pub fn open(&self) {
        *self.open.lock().unwrap() = true;
        self.cv.notify_all();
    }

    fn wait(&self) {
        let g = self.open.lock().unwrap();
        let _g = self.cv.wait_while(g, |open| !*open).unwrap();
    }
}

pub struct FakeExtractor {
    pub title: String,
    pub ext: String,
    pub steps: Vec<f64>,
    pub step_delay: Duration,
    pub gate: Option<Gate>,
    /// Wait at the gate after writing the part instead of before.
    pub hold_after_part: bool,
    pub fail_with: Option<String>,
    pub started: AtomicUsize,
}

impl Default for FakeExtractor {
    fn default() -> Self {
        Self {
            title: "Song".into(),
            ext: "mp3".into(),
            steps: vec![10.0, 35.5, 70.0, 100.0],
            step_delay: Duration::from_millis(20),
            gate: None,
            hold_after_part: false,
            fail_with: None,
            started: AtomicUsize::new(0),
        }
    }
}

impl FakeExtractor {
    pub fn gated() -> Self {
        Self {
            gate: Some(Gate::default()),
            ..Default::default()
        }
    }

    /// Writes its part file, then blocks until the gate opens.
    pub fn gated_after_part() -> Self {
        Self {
            hold_after_part: true,
            ..Self::gated()
        }
    }

    pub fn failing(detail: &str) -> Self {
        Self {
            fail_with: Some(detail.into()),
            ..Default::default()
        }
    }

    /// Slow enough to pause/cancel mid-transfer.
    pub fn slow() -> Self {
        Self {
            steps: (1..=50).map(|i| f64::from(i) * 2.0).collect(),
            step_delay: Duration::from_millis(40),
            ..Default::default()
        }
    }

    pub fn open_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.open();
        }
    }

    fn render(&self, template: &str) -> PathBuf {
        PathBuf::from(
            template
                .replace("%(title)s", &self.title)
                .replace("%(id)s", "fakeid")
                .replace("%(ext)s", &self.ext),
        )
    }
}

impl Extractor for FakeExtractor {
    fn extract(
        &self,
        _url: &str,
        options: &ExtractOptions,
        hook: &mut dyn FnMut(ProgressEvent) -> HookResult,
    ) -> Result<Extracted, ExtractError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        let final_path = self.render(&options.output_template);
        let part = PathBuf::from(format!("{}.part", final_path.display()));

        if !self.hold_after_part {
            if let Some(gate) = &self.gate {
                gate.wait();
            }
        }
        fs::write(&part, b"partial")?;
        if self.hold_after_part {
            if let Some(gate) = &self.gate {
                gate.wait();
            }
        }

        for p in &self.steps {
            let event = ProgressEvent::downloading(
                &format!("\x1b[0;94m{p:5.1}%\x1b[0m"),
                "\x1b[0;32m1.00MiB/s\x1b[0m",
                "\x1b[0;33m00:01\x1b[0m",
            )
            .with_filename(final_path.display().to_string());
            hook(event).map_err(|_| ExtractError::Cancelled)?;
            std::thread::sleep(self.step_delay);
        }

        if let Some(detail) = &self.fail_with {
            return Err(ExtractError::Failed {
                status: "exit status: 1".into(),
                detail: detail.clone(),
            });
        }

        hook(ProgressEvent::finished().with_filename(final_path.display().to_string()))
            .map_err(|_| ExtractError::Cancelled)?;
        fs::rename(&part, &final_path)?;
        Ok(Extracted {
            filename: Some(final_path.display().to_string()),
        })
    }

    fn probe(&self, url: &str) -> Result<MediaInfo, ExtractError> {
        let doc = serde_json::json!({
            "id": url.rsplit(['=', '/']).next().unwrap_or("x"),
            "title": self.title,
            "duration": 212.0,
            "thumbnail": "https://i.ytimg.com/vi/x/hq.jpg",
            "formats": [
                {
                    "format_id": "140",
                    "ext": "m4a",
                    "vcodec": "none",
                    "acodec": "mp4a.40.2",
                    "abr": 129.5,
                    "asr": 44100
                },
                {
                    "format_id": "137",
                    "ext": "mp4",
                    "vcodec": "avc1",
                    "acodec": "none",
                    "height": 1080,
                    "tbr": 4000.0,
                    "fps": 30.0
                }
            ]
        });
        Ok(MediaInfo::from_probe_json(doc.to_string().as_bytes())?)
    }
}
