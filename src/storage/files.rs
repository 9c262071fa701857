//! Durable storage for exported track files.

use crate::recording::types::ExportError;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Destination for finished documents.
pub trait TrackStorage: Send + Sync {
    /// Persist `contents` under `file_name` and return the full path.
    ///
    /// Either the whole file is written or nothing is left behind.
    fn write(&self, file_name: &str, contents: &str) -> Result<PathBuf, ExportError>;
}

/// Writes files into a directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct DirectoryStorage {
    dir: PathBuf,
}

impl DirectoryStorage {
    /// Store files under `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Destination directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl TrackStorage for DirectoryStorage {
    fn write(&self, file_name: &str, contents: &str) -> Result<PathBuf, ExportError> {
        let path = self.dir.join(file_name);
        let write_failed = |reason: String| ExportError::WriteFailed {
            path: path.clone(),
            reason,
        };

        fs::create_dir_all(&self.dir).map_err(|e| write_failed(e.to_string()))?;

        if path.exists() {
            tracing::warn!("Replacing existing track file {}", path.display());
        }

        // Write next to the target, then rename into place
        let tmp_path = self.dir.join(format!(".{}.part", file_name));
        let result = write_synced(&tmp_path, contents).and_then(|_| fs::rename(&tmp_path, &path));

        if let Err(e) = result {
            let _ = fs::remove_file(&tmp_path);
            tracing::warn!("Failed to write {}: {}", path.display(), e);
            return Err(write_failed(e.to_string()));
        }

        tracing::debug!("Wrote {} bytes to {}", contents.len(), path.display());
        Ok(path)
    }
}

fn write_synced(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()
}
