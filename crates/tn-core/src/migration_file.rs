//! Migration files on disk
//!
//! Each change-set is stored as `<YYYYMMDDHHMMSS>_migration.sql`. The UTC
//! timestamp prefix makes lexicographic order equal creation order, which is
//! the order migrations must be applied in. Files are written once and never
//! modified.

use crate::error::{CoreError, CoreResult};
use chrono::{DateTime, Utc};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Extension of migration files.
pub const MIGRATION_EXTENSION: &str = "sql";

/// A persisted migration script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFile {
    /// File name, also the key recorded in the tracking table
    pub filename: String,
    /// Full SQL text, executed as one batch
    pub sql: String,
}

/// Name of the migration file created at `at`.
///
/// # Examples
/// ```
/// use chrono::TimeZone;
/// let at = chrono::Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
/// assert_eq!(tn_core::migration_filename(at), "20240309070501_migration.sql");
/// ```
pub fn migration_filename(at: DateTime<Utc>) -> String {
    format!(
        "{}_migration.{}",
        at.format("%Y%m%d%H%M%S"),
        MIGRATION_EXTENSION
    )
}

/// Directory holding migration files.
#[derive(Debug, Clone)]
pub struct MigrationDir {
    root: PathBuf,
}

impl MigrationDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn exists(&self) -> bool {
        self.root.is_dir()
    }

    /// Migration file names sorted lexicographically.
    ///
    /// A missing directory yields an empty list. Entries that are not
    /// `.sql` files are ignored.
    pub fn list(&self) -> CoreResult<Vec<String>> {
        if !self.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.root).map_err(|e| CoreError::io(&self.root, e))?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CoreError::io(&self.root, e))?;
            let path = entry.path();
            if !path.is_file()
                || path.extension().and_then(|e| e.to_str()) != Some(MIGRATION_EXTENSION)
            {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => log::warn!("Skipping non UTF-8 migration file name: {:?}", raw),
            }
        }
        names.sort();
        Ok(names)
    }

    /// Read one migration file by name.
    pub fn read(&self, filename: &str) -> CoreResult<MigrationFile> {
        let path = self.root.join(filename);
        let sql = fs::read_to_string(&path).map_err(|e| CoreError::io(&path, e))?;
        Ok(MigrationFile {
            filename: filename.to_string(),
            sql,
        })
    }

    /// Write a new migration file named after `at`.
    ///
    /// Never overwrites: an existing file with the same name is an error.
    pub fn write(&self, sql: &str, at: DateTime<Utc>) -> CoreResult<MigrationFile> {
        fs::create_dir_all(&self.root).map_err(|e| CoreError::io(&self.root, e))?;

        let filename = migration_filename(at);
        let path = self.root.join(&filename);
        let mut content = sql.to_string();
        if !content.ends_with('\n') {
            content.push('\n');
        }

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::AlreadyExists {
                    CoreError::MigrationFileExists {
                        path: path.display().to_string(),
                    }
                } else {
                    CoreError::io(&path, e)
                }
            })?;
        file.write_all(content.as_bytes())
            .map_err(|e| CoreError::io(&path, e))?;

        log::debug!("Wrote migration {}", path.display());
        Ok(MigrationFile {
            filename,
            sql: content,
        })
    }
}

#[cfg(test)]
#[path = "migration_file_test.rs"]
mod tests;
