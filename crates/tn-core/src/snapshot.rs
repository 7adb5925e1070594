//! Baseline schema snapshot storage
//!
//! The snapshot is the schema engine's own JSON description of the last
//! observed schema. Tabnit never interprets it: the engine reads the file
//! back when computing the next diff. The file is always replaced whole.

use crate::error::{CoreError, CoreResult};
use std::path::{Path, PathBuf};

/// Reads and writes the snapshot file at a fixed path.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the snapshot file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a baseline has been captured
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load and parse the whole snapshot.
    ///
    /// Returns [`CoreError::SnapshotMissing`] when no baseline exists.
    pub fn load(&self) -> CoreResult<serde_json::Value> {
        if !self.exists() {
            return Err(CoreError::SnapshotMissing {
                path: self.path.display().to_string(),
            });
        }

        let content =
            std::fs::read_to_string(&self.path).map_err(|e| CoreError::io(&self.path, e))?;
        serde_json::from_str(&content).map_err(|e| CoreError::SnapshotCorrupt {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Replace the snapshot atomically
    ///
    /// Uses write-to-temp-then-rename so a crash never leaves a truncated
    /// baseline behind.
    pub fn save(&self, schema: &serde_json::Value) -> CoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| CoreError::io(parent, e))?;
            }
        }

        let temp_path = self
            .path
            .with_extension(format!("json.{}.tmp", std::process::id()));
        let json = serde_json::to_string_pretty(schema)?;
        std::fs::write(&temp_path, &json).map_err(|e| CoreError::io(&temp_path, e))?;
        std::fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = std::fs::remove_file(&temp_path);
            CoreError::io(&self.path, e)
        })?;

        log::debug!("Wrote schema snapshot to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
#[path = "snapshot_test.rs"]
mod tests;
