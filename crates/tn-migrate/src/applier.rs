//! Migration applier
//!
//! Brings the database's applied-migration set in line with the migration
//! files on disk. Pending files are applied strictly in filename order, each
//! in its own transaction together with the tracking row that marks it
//! applied. The first failure rolls back that file and stops the run, so a
//! file is recorded if and only if its statements committed. Re-running
//! after a failure resumes at the first unrecorded file.

use crate::error::{MigrateError, MigrateResult};
use std::collections::BTreeSet;
use tn_core::sql_utils::quote_ident;
use tn_core::MigrationDir;
use tn_db::{with_transaction, Database, DbError};

/// Open the target database from a connection string.
///
/// A missing or blank connection string is a configuration error raised
/// before any work is done. `postgres://` and `postgresql://` URLs open a
/// PostgreSQL session; anything else is handed to DuckDB.
pub async fn connect(database_url: Option<&str>) -> MigrateResult<Box<dyn Database>> {
    match database_url.map(str::trim) {
        Some(url) if !url.is_empty() => Ok(tn_db::connect(url).await?),
        _ => Err(MigrateError::MissingDatabaseUrl),
    }
}

/// Files present in `candidates` but absent from `applied`, keeping the
/// (already sorted) candidate order.
pub fn pending_migrations(candidates: &[String], applied: &BTreeSet<String>) -> Vec<String> {
    candidates
        .iter()
        .filter(|name| !applied.contains(*name))
        .cloned()
        .collect()
}

/// Progress notifications emitted while applying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyEvent<'a> {
    /// Pending files were found; carries their count
    Pending(usize),
    /// About to apply the named file
    Applying(&'a str),
    /// The named file committed
    Applied(&'a str),
}

/// Outcome of a successful apply run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Files committed during this run, in order
    pub applied: Vec<String>,
    /// Number of files already recorded before the run
    pub previously_applied: usize,
    /// The migrations directory did not exist
    pub directory_missing: bool,
}

impl ApplyReport {
    /// True when nothing was pending.
    pub fn is_up_to_date(&self) -> bool {
        self.applied.is_empty()
    }
}

/// Applied and pending migrations at a point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationStatus {
    /// Names recorded in the tracking table, sorted
    pub applied: Vec<String>,
    /// Files on disk not yet recorded, in apply order
    pub pending: Vec<String>,
    /// Recorded names with no file on disk
    pub missing_files: Vec<String>,
}

/// Applies migration files from one directory to one database.
pub struct MigrationApplier<'a> {
    db: &'a dyn Database,
    dir: MigrationDir,
    tracking_table: String,
}

impl<'a> MigrationApplier<'a> {
    pub fn new(db: &'a dyn Database, dir: MigrationDir, tracking_table: impl Into<String>) -> Self {
        Self {
            db,
            dir,
            tracking_table: tracking_table.into(),
        }
    }

    pub fn tracking_table(&self) -> &str {
        &self.tracking_table
    }

    /// Create the tracking table if needed. Safe to call on every run.
    pub async fn ensure_tracking_table(&self) -> MigrateResult<()> {
        self.db
            .create_tracking_table(&self.tracking_table)
            .await
            .map_err(|source| self.tracking_error(source))
    }

    /// Names of all migrations recorded as applied.
    pub async fn applied_migrations(&self) -> MigrateResult<BTreeSet<String>> {
        let sql = format!("SELECT name FROM {}", quote_ident(&self.tracking_table));
        let names = self
            .db
            .query_strings(&sql)
            .await
            .map_err(|source| self.tracking_error(source))?;
        Ok(names.into_iter().collect())
    }

    /// Compare the tracking table with the files on disk.
    pub async fn status(&self) -> MigrateResult<MigrationStatus> {
        self.ensure_tracking_table().await?;
        let applied = self.applied_migrations().await?;
        let candidates = self.dir.list()?;
        let on_disk: BTreeSet<&String> = candidates.iter().collect();

        Ok(MigrationStatus {
            pending: pending_migrations(&candidates, &applied),
            missing_files: applied
                .iter()
                .filter(|name| !on_disk.contains(name))
                .cloned()
                .collect(),
            applied: applied.into_iter().collect(),
        })
    }

    /// Apply every pending migration, stopping at the first failure.
    pub async fn apply_pending(&self) -> MigrateResult<ApplyReport> {
        self.apply_pending_with(|_| {}).await
    }

    /// Like [`apply_pending`](Self::apply_pending), reporting progress to
    /// `on_event` as each file starts and commits.
    pub async fn apply_pending_with<F>(&self, mut on_event: F) -> MigrateResult<ApplyReport>
    where
        F: FnMut(ApplyEvent<'_>),
    {
        self.ensure_tracking_table().await?;
        let applied = self.applied_migrations().await?;
        let candidates = self.dir.list()?;
        let pending = pending_migrations(&candidates, &applied);

        let mut report = ApplyReport {
            applied: Vec::with_capacity(pending.len()),
            previously_applied: applied.len(),
            directory_missing: !self.dir.exists(),
        };
        if pending.is_empty() {
            return Ok(report);
        }

        on_event(ApplyEvent::Pending(pending.len()));
        let insert = format!(
            "INSERT INTO {} (name) VALUES ($1)",
            quote_ident(&self.tracking_table)
        );

        for name in &pending {
            on_event(ApplyEvent::Applying(name));
            log::debug!("Applying migration {} on {}", name, self.db.db_type());

            if let Err(source) = self.apply_one(name, &insert).await {
                return Err(MigrateError::ApplyFailed {
                    file: name.clone(),
                    applied: report.applied,
                    source,
                });
            }

            on_event(ApplyEvent::Applied(name));
            report.applied.push(name.clone());
        }

        Ok(report)
    }

    /// Run one file and record it inside a single transaction.
    async fn apply_one(
        &self,
        name: &str,
        insert: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let file = self.dir.read(name)?;
        let sql = file.sql.as_str();

        with_transaction(self.db, |db| async move {
            db.execute_batch(sql).await?;
            db.execute_with_text(insert, name).await?;
            Ok::<_, DbError>(())
        })
        .await?;
        Ok(())
    }

    fn tracking_error(&self, source: DbError) -> MigrateError {
        MigrateError::TrackingTable {
            table: self.tracking_table.clone(),
            source,
        }
    }
}

#[cfg(test)]
#[path = "applier_test.rs"]
mod tests;
