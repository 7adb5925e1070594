//! Status command implementation - lists applied and pending migrations

use anyhow::Result;
use tn_migrate::MigrationApplier;

use crate::cli::{GlobalArgs, StatusArgs};
use crate::commands::common::{connect_database, ProjectContext};

/// Execute the status command
pub(crate) async fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let project = ProjectContext::load(global)?;
    let db = connect_database(global).await?;
    let dir = project.migration_dir(args.migrations_dir.as_deref());
    let applier = MigrationApplier::new(db.as_ref(), dir, project.config.tracking_table.clone());

    let status = applier.status().await?;

    println!("Applied ({}):", status.applied.len());
    for name in &status.applied {
        if status.missing_files.contains(name) {
            println!("  {} (file missing)", name);
        } else {
            println!("  {}", name);
        }
    }

    println!("Pending ({}):", status.pending.len());
    for name in &status.pending {
        println!("  {}", name);
    }

    Ok(())
}
