//! Init command implementation - captures the baseline snapshot

use anyhow::{Context, Result};
use tn_migrate::Workflow;

use crate::cli::{GlobalArgs, InitArgs};
use crate::commands::common::ProjectContext;

/// Execute the init command
pub(crate) async fn execute(args: &InitArgs, global: &GlobalArgs) -> Result<()> {
    let project = ProjectContext::load(global)?;
    let source = project.source_dir(args.dir.as_deref());
    let engine = project.engine();
    let workflow = Workflow::new(&engine, project.snapshot_store(), project.migration_dir(None));

    println!("Capturing schema from {}...", source.display());
    workflow
        .initialize(&source, args.force)
        .await
        .context("Failed to capture baseline snapshot")?;

    println!(
        "Baseline snapshot written to {}",
        workflow.snapshots().path().display()
    );
    println!("No migration generated; the database is assumed to match this baseline.");
    Ok(())
}
