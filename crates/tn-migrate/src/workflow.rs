//! Snapshot/diff workflow
//!
//! `init` captures a baseline snapshot; `up` diffs the source against that
//! baseline, writes a migration for any changes, and moves the baseline
//! forward. The migration file is always written before the snapshot is
//! replaced, so a failed write leaves the previous baseline in place and the
//! next `up` sees the same changes again.

use crate::engine::SchemaEngine;
use crate::error::MigrateResult;
use chrono::{DateTime, Utc};
use std::path::Path;
use tn_core::sql_gen::{statements, STATEMENT_SEPARATOR};
use tn_core::{CoreError, MigrationDir, MigrationFile, SnapshotStore};

/// Where a project stands before an operation runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    /// No baseline captured yet; only `initialize` is usable
    NoSnapshot,
    /// A baseline snapshot exists
    Baselined,
}

/// Result of a refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The source matches the baseline; nothing was written
    UpToDate,
    /// A migration was written and the baseline advanced
    ChangesDetected {
        migration: MigrationFile,
        /// Number of rendered statements (safeguard comments included)
        statements: usize,
    },
}

/// Drives a schema engine against one snapshot store and migration directory
pub struct Workflow<'a, E: SchemaEngine + ?Sized> {
    engine: &'a E,
    snapshots: SnapshotStore,
    migrations: MigrationDir,
}

impl<'a, E: SchemaEngine + ?Sized> Workflow<'a, E> {
    pub fn new(engine: &'a E, snapshots: SnapshotStore, migrations: MigrationDir) -> Self {
        Self {
            engine,
            snapshots,
            migrations,
        }
    }

    pub fn snapshots(&self) -> &SnapshotStore {
        &self.snapshots
    }

    pub fn migrations(&self) -> &MigrationDir {
        &self.migrations
    }

    pub fn state(&self) -> WorkflowState {
        if self.snapshots.exists() {
            WorkflowState::Baselined
        } else {
            WorkflowState::NoSnapshot
        }
    }

    /// Capture the current schema under `source` as the baseline.
    ///
    /// The database is assumed to already match it, so no migration is
    /// written. An existing baseline is only replaced when `force` is set.
    pub async fn initialize(&self, source: &Path, force: bool) -> MigrateResult<()> {
        if !force && self.state() == WorkflowState::Baselined {
            return Err(CoreError::SnapshotExists {
                path: self.snapshots.path().display().to_string(),
            }
            .into());
        }

        let schema = self.engine.snapshot(source).await?;
        self.snapshots.save(&schema)?;
        log::debug!(
            "Baseline for {} stored at {}",
            source.display(),
            self.snapshots.path().display()
        );
        Ok(())
    }

    /// Generate a migration for changes made under `source` since the
    /// baseline.
    pub async fn refresh(&self, source: &Path) -> MigrateResult<RefreshOutcome> {
        self.refresh_at(source, Utc::now()).await
    }

    /// [`refresh`](Self::refresh) with an explicit timestamp for the
    /// migration filename.
    pub async fn refresh_at(
        &self,
        source: &Path,
        at: DateTime<Utc>,
    ) -> MigrateResult<RefreshOutcome> {
        if self.state() == WorkflowState::NoSnapshot {
            return Err(CoreError::SnapshotMissing {
                path: self.snapshots.path().display().to_string(),
            }
            .into());
        }

        let diff = self.engine.diff(self.snapshots.path(), source).await?;
        if diff.is_empty() {
            log::debug!("No schema changes under {}", source.display());
            return Ok(RefreshOutcome::UpToDate);
        }

        let observed = self.engine.snapshot(source).await?;
        let rendered = statements(&diff);
        let migration = self
            .migrations
            .write(&rendered.join(STATEMENT_SEPARATOR), at)?;
        self.snapshots.save(&observed)?;

        log::debug!(
            "{} change(s) written to {}",
            diff.len(),
            migration.filename
        );
        Ok(RefreshOutcome::ChangesDetected {
            migration,
            statements: rendered.len(),
        })
    }
}

#[cfg(test)]
#[path = "workflow_test.rs"]
mod tests;
