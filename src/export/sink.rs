//! Save targets for exported files
//!
//! Exporters produce bytes; a [`SaveSink`] decides where they go.
//! [`DirectorySink`] writes through a temporary file in the target directory
//! and renames it into place, so a failed save never leaves a partial file.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::info;

use super::ExportError;

/// Where a saved file ended up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedFile {
    pub filename: String,
    /// Full path for directory saves, the filename otherwise
    pub location: String,
    pub bytes_written: usize,
}

/// Destination for exported bytes
pub trait SaveSink {
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<SavedFile, ExportError>;
}

/// Reject names that would escape the target directory
fn check_filename(filename: &str) -> Result<(), ExportError> {
    if filename.is_empty()
        || filename == "."
        || filename == ".."
        || filename.contains(['/', '\\'])
    {
        return Err(ExportError::ValidationError(format!(
            "Invalid output filename: '{}'",
            filename
        )));
    }
    Ok(())
}

/// Saves files into a directory
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl SaveSink for DirectorySink {
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<SavedFile, ExportError> {
        check_filename(filename)?;
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            ExportError::IoError(format!("Failed to create {}: {}", self.dir.display(), e))
        })?;

        // dropped (and deleted) on every early return
        let mut temp = NamedTempFile::new_in(&self.dir)?;
        temp.write_all(bytes)?;
        temp.as_file().sync_all()?;

        let target = self.dir.join(filename);
        temp.persist(&target).map_err(|e| {
            ExportError::IoError(format!("Failed to save {}: {}", target.display(), e.error))
        })?;

        info!("Saved {} ({} bytes)", target.display(), bytes.len());
        Ok(SavedFile {
            filename: filename.to_string(),
            location: target.display().to_string(),
            bytes_written: bytes.len(),
        })
    }
}

/// Keeps saved files in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    files: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, filename: &str) -> Option<Vec<u8>> {
        self.lock().get(filename).cloned()
    }

    pub fn filenames(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Vec<u8>>> {
        // a panic mid-insert cannot leave the map inconsistent
        self.files.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SaveSink for MemorySink {
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<SavedFile, ExportError> {
        check_filename(filename)?;
        self.lock().insert(filename.to_string(), bytes.to_vec());
        Ok(SavedFile {
            filename: filename.to_string(),
            location: filename.to_string(),
            bytes_written: bytes.len(),
        })
    }
}
