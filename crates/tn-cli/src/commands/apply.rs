//! Apply command implementation - runs pending migrations

use anyhow::Result;
use tn_migrate::{ApplyEvent, MigrateError, MigrationApplier};

use crate::cli::{ApplyArgs, GlobalArgs};
use crate::commands::common::{connect_database, ExitCode, ProjectContext};

/// Execute the apply command
pub(crate) async fn execute(args: &ApplyArgs, global: &GlobalArgs) -> Result<()> {
    let project = ProjectContext::load(global)?;
    let db = connect_database(global).await?;
    let dir = project.migration_dir(args.migrations_dir.as_deref());
    let applier = MigrationApplier::new(db.as_ref(), dir, project.config.tracking_table.clone());

    let result = applier
        .apply_pending_with(|event| match event {
            ApplyEvent::Pending(count) => println!("Found {} pending migration(s).", count),
            ApplyEvent::Applying(name) => println!("  Applying {}...", name),
            ApplyEvent::Applied(name) => println!("  Applied {}", name),
        })
        .await;

    match result {
        Ok(report) if report.directory_missing => {
            println!("No migrations directory found.");
            Ok(())
        }
        Ok(report) if report.is_up_to_date() => {
            println!("Database is up to date.");
            Ok(())
        }
        Ok(report) => {
            println!(
                "\nAll migrations applied successfully ({} applied).",
                report.applied.len()
            );
            Ok(())
        }
        Err(MigrateError::ApplyFailed {
            file,
            applied,
            source,
        }) => {
            eprintln!("  Failed to apply {}: {}", file, source);
            eprintln!(
                "Rolled back {}. {} migration(s) committed before the failure; later files were not attempted.",
                file,
                applied.len()
            );
            Err(ExitCode(1).into())
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
#[path = "apply_test.rs"]
mod tests;
