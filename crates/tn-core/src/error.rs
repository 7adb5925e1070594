//! Error types for tn-core

use thiserror::Error;

/// Core error type for Tabnit
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config {path}: {message}")]
    ConfigParseError { path: String, message: String },

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: Schema diff document could not be parsed
    #[error("[E004] Failed to parse schema diff: {message}")]
    DiffParseError { message: String },

    /// E005: No baseline snapshot has been captured yet
    #[error("[E005] No schema snapshot found at {path}. Run `tabnit init` first.")]
    SnapshotMissing { path: String },

    /// E006: A baseline snapshot already exists
    #[error("[E006] A schema snapshot already exists at {path}")]
    SnapshotExists { path: String },

    /// E007: Snapshot file exists but is not valid JSON
    #[error("[E007] Corrupt schema snapshot at {path}: {message}")]
    SnapshotCorrupt { path: String, message: String },

    /// E008: Refusing to overwrite an existing migration file
    #[error("[E008] Migration file already exists: {path}")]
    MigrationFileExists { path: String },

    /// E009: IO error with file path context
    #[error("[E009] Failed to access '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        CoreError::IoWithPath {
            path: path.display().to_string(),
            source,
        }
    }
}
