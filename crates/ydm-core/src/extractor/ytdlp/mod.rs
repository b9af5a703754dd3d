//! `yt-dlp` subprocess extractor.
//!
//! Progress is requested through a machine-readable `--progress-template` and
//! read line by line from both output streams. Lines are handed to the job's
//! hook on the calling thread through a small bounded channel, so a hook that
//! blocks (pause) eventually blocks the reader threads and then yt-dlp itself
//! on a full pipe.

mod args;
mod parse;

pub use parse::parse_progress_line;

use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{sync_channel, SyncSender};
use std::thread;

use super::{ExtractError, ExtractOptions, Extracted, Extractor, HookResult, ProgressEvent};
use crate::format::MediaInfo;

/// Lines buffered between the pipe readers and the hook.
const LINE_BUFFER: usize = 64;
/// Error lines kept for the failure message.
const MAX_ERROR_LINES: usize = 5;

/// Extractor backed by the `yt-dlp` executable.
#[derive(Debug, Clone)]
pub struct YtDlp {
    program: PathBuf,
}

impl YtDlp {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn spawn(&self, args: Vec<std::ffi::OsString>) -> Result<Child, ExtractError> {
        Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ExtractError::Spawn {
                program: self.program.clone(),
                source,
            })
    }
}

impl Default for YtDlp {
    fn default() -> Self {
        Self::new("yt-dlp")
    }
}

fn forward_lines<R: Read + Send + 'static>(
    stream: R,
    tx: SyncSender<String>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut reader = BufReader::new(stream);
        let mut buf = Vec::new();
        let mut forwarding = true;
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    tracing::debug!("yt-dlp pipe read: {}", e);
                    break;
                }
            }
            // Drain until EOF even when nobody listens: a closed pipe would
            // kill yt-dlp with SIGPIPE.
            if !forwarding {
                continue;
            }
            let line = String::from_utf8_lossy(&buf);
            let line = line.trim_end_matches(['\n', '\r']).to_string();
            forwarding = tx.send(line).is_ok();
        }
    })
}

/// Kills the child and reaps it; used when the hook cancels.
fn abort_child(child: &mut Child) {
    if let Err(e) = child.kill() {
        tracing::debug!("yt-dlp kill: {}", e);
    }
    let _ = child.wait();
}

impl Extractor for YtDlp {
    fn extract(
        &self,
        url: &str,
        options: &ExtractOptions,
        hook: &mut dyn FnMut(ProgressEvent) -> HookResult,
    ) -> Result<Extracted, ExtractError> {
        let mut child = self.spawn(args::download_args(url, options))?;
        tracing::debug!(url, pid = child.id(), "yt-dlp started");

        let (tx, rx) = sync_channel::<String>(LINE_BUFFER);
        let mut readers = Vec::with_capacity(2);
        if let Some(out) = child.stdout.take() {
            readers.push(forward_lines(out, tx.clone()));
        }
        if let Some(err) = child.stderr.take() {
            readers.push(forward_lines(err, tx.clone()));
        }
        drop(tx);

        let mut filename = None;
        let mut errors: Vec<String> = Vec::new();
        let mut last_line = None;
        let mut cancelled = false;
        while let Ok(line) = rx.recv() {
            if let Some(event) = parse::parse_progress_line(&line) {
                if hook(event).is_err() {
                    cancelled = true;
                    break;
                }
            } else if let Some(path) = parse::parse_file_line(&line) {
                filename = Some(path);
            } else {
                if parse::is_error_line(&line) && errors.len() < MAX_ERROR_LINES {
                    errors.push(line.trim().to_string());
                }
                tracing::trace!(target: "ydm_core::ytdlp", "{}", line);
                last_line = Some(line);
            }
        }

        if cancelled {
            // Readers are left to exit on their own once the pipes close.
            drop(rx);
            abort_child(&mut child);
            return Err(ExtractError::Cancelled);
        }

        let status = child.wait()?;
        for r in readers {
            let _ = r.join();
        }
        if !status.success() {
            let detail = if errors.is_empty() {
                last_line.unwrap_or_else(|| "no output".to_string())
            } else {
                errors.join("; ")
            };
            return Err(ExtractError::Failed {
                status: status.to_string(),
                detail,
            });
        }
        Ok(Extracted { filename })
    }

    fn probe(&self, url: &str) -> Result<MediaInfo, ExtractError> {
        let output = Command::new(&self.program)
            .args(args::probe_args(url))
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ExtractError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr
                .lines()
                .find(|l| parse::is_error_line(l))
                .or_else(|| stderr.lines().last())
                .unwrap_or("no output")
                .trim()
                .to_string();
            return Err(ExtractError::Failed {
                status: output.status.to_string(),
                detail,
            });
        }
        Ok(MediaInfo::from_probe_json(&output.stdout)?)
    }
}
