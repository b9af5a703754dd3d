//! Removal of partial artifacts left by an unfinished job.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::JobId;

/// Suffixes yt-dlp uses for in-progress files next to the target name.
const PARTIAL_SUFFIXES: [&str; 2] = [".part", ".ytdl"];

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut o = path.as_os_str().to_owned();
    o.push(suffix);
    PathBuf::from(o)
}

/// Every file that may belong to the unfinished job: the known partial file
/// and its in-progress siblings, plus any file in the download directory
/// whose name carries the job id.
pub(super) fn partial_artifacts(
    download_dir: &Path,
    id: &JobId,
    partial: Option<&Path>,
) -> Vec<PathBuf> {
    let mut targets = Vec::new();
    if let Some(p) = partial {
        targets.push(p.to_path_buf());
        targets.extend(PARTIAL_SUFFIXES.iter().map(|s| with_suffix(p, s)));
    }
    match fs::read_dir(download_dir) {
        Ok(entries) => {
            for entry in entries.flatten() {
                let tagged = entry
                    .file_name()
                    .to_str()
                    .is_some_and(|n| n.contains(id.as_str()));
                if tagged && !targets.contains(&entry.path()) {
                    targets.push(entry.path());
                }
            }
        }
        Err(e) => {
            tracing::warn!(job_id = %id, dir = %download_dir.display(), "cleanup scan: {}", e);
        }
    }
    targets
}

/// Deletes `paths`, ignoring ones that are already gone. Errors are logged,
/// never returned.
pub(super) fn remove_quietly(id: &JobId, paths: &[PathBuf]) -> usize {
    let mut removed = 0;
    for path in paths {
        if !path.is_file() {
            continue;
        }
        match fs::remove_file(path) {
            Ok(()) => {
                removed += 1;
                tracing::info!(job_id = %id, "cleaned up incomplete file: {}", path.display());
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(job_id = %id, "cleanup error for {}: {}", path.display(), e);
            }
        }
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_partial_siblings_and_tagged_files() {
        let dir = tempfile::tempdir().unwrap();
        let id = JobId::from("dl_0badf00d");
        let partial = dir.path().join("Song_dl_0badf00d.f251.webm");
        fs::write(with_suffix(&partial, ".part"), b"x").unwrap();
        fs::write(dir.path().join("Song_dl_0badf00d.mp3"), b"x").unwrap();
        fs::write(dir.path().join("Other_dl_12345678.mp3"), b"x").unwrap();

        let targets = partial_artifacts(dir.path(), &id, Some(&partial));
        assert!(targets.contains(&partial));
        assert!(targets.contains(&with_suffix(&partial, ".part")));
        assert!(targets.contains(&dir.path().join("Song_dl_0badf00d.mp3")));
        assert!(!targets.contains(&dir.path().join("Other_dl_12345678.mp3")));

        let removed = remove_quietly(&id, &targets);
        assert_eq!(removed, 2);
        assert!(dir.path().join("Other_dl_12345678.mp3").exists());
        assert_eq!(remove_quietly(&id, &targets), 0);
    }

    #[test]
    fn missing_directory_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("gone");
        let targets = partial_artifacts(&gone, &JobId::from("dl_00000001"), None);
        assert!(targets.is_empty());
    }
}
