//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use tn_core::{Config, MigrationDir, SnapshotStore};
use tn_db::Database;
use tn_migrate::CommandEngine;

use crate::cli::GlobalArgs;

/// Error type representing a non-zero process exit code.
///
/// Commands that have already printed their own failure report return
/// `Err(ExitCode(N).into())`; `main` exits with `N` without printing again.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only; never shown to the user.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// A loaded project: its root directory and configuration
#[derive(Debug, Clone)]
pub(crate) struct ProjectContext {
    pub(crate) root: PathBuf,
    pub(crate) config: Config,
}

impl ProjectContext {
    /// Load configuration for the project selected by the global args.
    ///
    /// `--config` must point at an existing file; otherwise `tabnit.yml` in
    /// the project directory is used if present, and defaults if not.
    pub(crate) fn load(global: &GlobalArgs) -> Result<Self> {
        let root = PathBuf::from(&global.project_dir);
        let config = match &global.config {
            Some(path) => Config::load(Path::new(path)),
            None => Config::load_from_dir(&root),
        }
        .context("Failed to load project configuration")?;

        log::debug!("Project root: {}", root.display());
        Ok(Self { root, config })
    }

    /// Directory handed to the schema engine: `dir` if given, else the
    /// project root.
    pub(crate) fn source_dir(&self, dir: Option<&str>) -> PathBuf {
        dir.map(PathBuf::from).unwrap_or_else(|| self.root.clone())
    }

    /// Migration directory, honouring a command-line override.
    pub(crate) fn migration_dir(&self, override_dir: Option<&str>) -> MigrationDir {
        match override_dir {
            Some(dir) => MigrationDir::new(dir),
            None => MigrationDir::new(self.config.migrations_path(&self.root)),
        }
    }

    pub(crate) fn snapshot_store(&self) -> SnapshotStore {
        SnapshotStore::new(self.config.snapshot_file(&self.root))
    }

    pub(crate) fn engine(&self) -> CommandEngine {
        CommandEngine::from_config(&self.config.engine)
    }
}

/// Open the database named by `--database-url` / `DATABASE_URL`.
pub(crate) async fn connect_database(global: &GlobalArgs) -> Result<Box<dyn Database>> {
    let db = tn_migrate::connect(global.database_url.as_deref()).await?;
    log::debug!("Connected to {} database", db.db_type());
    Ok(db)
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
