//! tn-migrate - Migration engine for Tabnit
//!
//! Applies pending migration files transactionally, bridges to the external
//! schema engine, and drives the snapshot/diff workflow that produces new
//! migration files.

pub mod applier;
pub mod engine;
pub mod error;
pub mod workflow;

pub use applier::{
    connect, pending_migrations, ApplyEvent, ApplyReport, MigrationApplier, MigrationStatus,
};
pub use engine::{CommandEngine, SchemaEngine};
pub use error::{MigrateError, MigrateResult};
pub use workflow::{RefreshOutcome, Workflow, WorkflowState};
