//! Advisory lock serialising uploads against a single data directory.
//!
//! The store is written by at most one upload at a time. The lock is a
//! plain file created with `create_new`, so acquiring it fails while a
//! previous holder still exists. Dropping the guard removes the file.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{PipelineError, Result};

/// Guard held for the duration of an upload.
///
/// The lock file is removed when the guard is dropped. A crash leaves
/// the file behind; operators clear it manually after confirming no
/// upload is running.
#[derive(Debug)]
pub struct UploadLock {
    path: PathBuf,
}

impl UploadLock {
    /// Acquires the lock by creating `path`, failing if it exists.
    pub fn acquire(path: &Path) -> Result<Self> {
        let result = OpenOptions::new().write(true).create_new(true).open(path);

        match result {
            Ok(mut file) => {
                let _ = writeln!(file, "{}", std::process::id());
                Ok(Self {
                    path: path.to_path_buf(),
                })
            }
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
                Err(PipelineError::Persistence(format!(
                    "another upload is already in progress (lock file {} exists)",
                    path.display()
                )))
            }
            Err(err) => Err(PipelineError::Persistence(format!(
                "could not create lock file {}: {}",
                path.display(),
                err
            ))),
        }
    }

    /// Path of the lock file held by this guard.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for UploadLock {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_acquire_creates_and_drop_removes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".upload.lock");

        {
            let lock = UploadLock::acquire(&path).unwrap();
            assert!(path.exists());
            assert_eq!(lock.path(), path);
        }

        assert!(!path.exists());
    }

    #[test]
    fn test_second_acquire_fails_while_held() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".upload.lock");

        let _held = UploadLock::acquire(&path).unwrap();
        let err = UploadLock::acquire(&path).unwrap_err();

        assert!(matches!(err, PipelineError::Persistence(_)));
        assert!(err.to_string().contains("already in progress"));
    }

    #[test]
    fn test_lock_can_be_reacquired_after_release() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".upload.lock");

        drop(UploadLock::acquire(&path).unwrap());
        let second = UploadLock::acquire(&path);
        assert!(second.is_ok());
    }
}
