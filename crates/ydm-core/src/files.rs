//! Resolution of client-supplied artifact names to files on disk.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::url_model::sanitize_filename;

/// Names some clients send when they have no filename yet.
const PLACEHOLDER_NAMES: [&str; 3] = ["null", "none", "undefined"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FileError {
    #[error("invalid file name: {0:?}")]
    Blocked(String),
    #[error("file not found: {0}")]
    NotFound(String),
}

/// Maps `name` to a file directly inside `dir`. Path separators and reserved
/// characters are stripped, so the result never escapes `dir`.
pub fn resolve_artifact(dir: &Path, name: &str) -> Result<PathBuf, FileError> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || PLACEHOLDER_NAMES
            .iter()
            .any(|p| trimmed.eq_ignore_ascii_case(p))
    {
        return Err(FileError::Blocked(name.to_string()));
    }
    let safe = sanitize_filename(trimmed);
    if safe.is_empty() || safe.chars().all(|c| c == '.') {
        return Err(FileError::Blocked(name.to_string()));
    }
    let path = dir.join(&safe);
    if path.is_file() {
        Ok(path)
    } else {
        Err(FileError::NotFound(safe))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn placeholders_are_blocked() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["null", "None", "UNDEFINED", " ", ".."] {
            assert_eq!(
                resolve_artifact(dir.path(), name),
                Err(FileError::Blocked(name.to_string())),
                "{name:?}"
            );
        }
    }

    #[test]
    fn existing_file_resolves() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Song_dl_1a2b3c4d.mp3"), b"x").unwrap();
        assert_eq!(
            resolve_artifact(dir.path(), "Song_dl_1a2b3c4d.mp3").unwrap(),
            dir.path().join("Song_dl_1a2b3c4d.mp3")
        );
    }

    #[test]
    fn traversal_is_flattened_into_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("..secret.txt"), b"x").unwrap();
        let got = resolve_artifact(dir.path(), "../secret.txt").unwrap();
        assert_eq!(got, dir.path().join("..secret.txt"));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            resolve_artifact(dir.path(), "nope.mp4"),
            Err(FileError::NotFound("nope.mp4".into()))
        );
    }
}
