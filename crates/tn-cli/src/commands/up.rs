//! Up command implementation - writes a migration for schema changes

use anyhow::{Context, Result};
use tn_migrate::{RefreshOutcome, Workflow};

use crate::cli::{GlobalArgs, UpArgs};
use crate::commands::common::ProjectContext;

/// Execute the up command
pub(crate) async fn execute(args: &UpArgs, global: &GlobalArgs) -> Result<()> {
    let project = ProjectContext::load(global)?;
    let source = project.source_dir(args.dir.as_deref());
    let engine = project.engine();
    let workflow = Workflow::new(&engine, project.snapshot_store(), project.migration_dir(None));

    println!("Comparing {} against the snapshot...", source.display());
    let outcome = workflow
        .refresh(&source)
        .await
        .context("Failed to generate migration")?;

    match outcome {
        RefreshOutcome::UpToDate => {
            println!("Schema is up to date. No migration generated.");
        }
        RefreshOutcome::ChangesDetected {
            migration,
            statements,
        } => {
            println!(
                "Wrote {} ({} statement{})",
                workflow.migrations().path().join(&migration.filename).display(),
                statements,
                if statements == 1 { "" } else { "s" }
            );
            println!("Snapshot updated. Review the file, then run `tabnit apply`.");
        }
    }
    Ok(())
}
