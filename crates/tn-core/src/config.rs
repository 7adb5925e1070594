//! Configuration types and parsing for tabnit.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file names looked up in the project directory, in order
pub const CONFIG_FILE_NAMES: &[&str] = &["tabnit.yml", "tabnit.yaml"];

/// Project configuration from tabnit.yml
///
/// Every field has a default, so a project without a config file behaves
/// exactly like one with an empty file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory holding migration files
    #[serde(default = "default_migrations_dir")]
    pub migrations_dir: String,

    /// Path of the baseline schema snapshot
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,

    /// Name of the table recording applied migrations
    #[serde(default = "default_tracking_table")]
    pub tracking_table: String,

    /// External schema engine invocation
    #[serde(default)]
    pub engine: EngineConfig,
}

/// How to invoke the external schema engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Program name (looked up on PATH) or path
    #[serde(default = "default_engine_program")]
    pub program: String,

    /// Arguments placed before the engine subcommand
    #[serde(default)]
    pub args: Vec<String>,
}

fn default_migrations_dir() -> String {
    "migrations".to_string()
}

fn default_snapshot_path() -> String {
    ".tabnit/snapshot.json".to_string()
}

fn default_tracking_table() -> String {
    "tabnit_migrations".to_string()
}

fn default_engine_program() -> String {
    "tabnit-engine".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            migrations_dir: default_migrations_dir(),
            snapshot_path: default_snapshot_path(),
            tracking_table: default_tracking_table(),
            engine: EngineConfig::default(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            program: default_engine_program(),
            args: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
        let config: Config = if content.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(&content).map_err(|e| CoreError::ConfigParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    ///
    /// Looks for tabnit.yml or tabnit.yaml and falls back to defaults when
    /// neither exists.
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        match CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
        {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Migrations directory resolved against the project root
    pub fn migrations_path(&self, root: &Path) -> PathBuf {
        root.join(&self.migrations_dir)
    }

    /// Snapshot file resolved against the project root
    pub fn snapshot_file(&self, root: &Path) -> PathBuf {
        root.join(&self.snapshot_path)
    }

    fn validate(&self) -> CoreResult<()> {
        let required = [
            ("migrations_dir", &self.migrations_dir),
            ("snapshot_path", &self.snapshot_path),
            ("tracking_table", &self.tracking_table),
            ("engine.program", &self.engine.program),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(CoreError::ConfigInvalid {
                    message: format!("'{}' cannot be empty", field),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
