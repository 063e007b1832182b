//! Pre-flight probe that a folder can be written, read back and cleaned.
//!
//! Catches a backup disk that failed to mount (writes land on the wrong
//! filesystem or fail) before any tool touches it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure of one probe phase.
#[derive(Debug, Error)]
pub enum FolderCheckError {
    #[error("write check failed for {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("read check failed for {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("read check failed for {path}: different value (wanted {expected}, got {actual:?})")]
    Mismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("cleanup of {path} failed: {source}")]
    Cleanup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Name of the probe file for `value`.
pub fn probe_file_name(value: u64) -> String {
    format!("backup-helper-probe-{value}.tmp")
}

/// Write a random value into a probe file in `dir`, read it back, delete it.
pub fn check_folder(dir: &Path) -> Result<(), FolderCheckError> {
    let value: u64 = rand::random();
    let path = dir.join(probe_file_name(value));
    let expected = value.to_string();

    fs::write(&path, &expected).map_err(|source| FolderCheckError::Write {
        path: path.clone(),
        source,
    })?;

    if let Err(err) = read_back(&path, &expected) {
        // Best effort; the read failure is what gets reported.
        let _ = fs::remove_file(&path);
        return Err(err);
    }

    fs::remove_file(&path).map_err(|source| FolderCheckError::Cleanup {
        path: path.clone(),
        source,
    })?;

    tracing::info!(dir = %dir.display(), "folder check passed");
    Ok(())
}

fn read_back(path: &Path, expected: &str) -> Result<(), FolderCheckError> {
    let bytes = fs::read(path).map_err(|source| FolderCheckError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if bytes != expected.as_bytes() {
        return Err(FolderCheckError::Mismatch {
            path: path.to_path_buf(),
            expected: expected.to_string(),
            actual: String::from_utf8_lossy(&bytes).into_owned(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn probe_succeeds_and_leaves_no_residue() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("keep.txt"), "data").unwrap();

        check_folder(dir.path()).expect("writable folder passes");

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["keep.txt"]);
    }

    #[test]
    fn missing_folder_fails_in_write_phase() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("not-mounted");

        let err = check_folder(&missing).unwrap_err();
        assert!(matches!(err, FolderCheckError::Write { .. }), "got: {err}");
        assert!(err.to_string().contains("not-mounted"));
    }

    #[test]
    fn folder_that_is_a_file_fails_in_write_phase() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("plain-file");
        fs::write(&file, "x").unwrap();

        let err = check_folder(&file).unwrap_err();
        assert!(matches!(err, FolderCheckError::Write { .. }), "got: {err}");
    }

    #[test]
    fn mismatch_reports_both_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(probe_file_name(7));
        fs::write(&path, "8").unwrap();

        let err = read_back(&path, "7").unwrap_err();
        assert!(
            matches!(err, FolderCheckError::Mismatch { ref expected, ref actual, .. } if expected == "7" && actual == "8"),
            "got: {err}"
        );
    }

    #[test]
    fn unreadable_probe_is_a_read_error() {
        let dir = TempDir::new().unwrap();
        let err = read_back(&dir.path().join("gone.tmp"), "1").unwrap_err();
        assert!(matches!(err, FolderCheckError::Read { .. }), "got: {err}");
    }
}
