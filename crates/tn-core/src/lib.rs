//! tn-core - Core library for Tabnit
//!
//! This crate provides the schema diff model, the diff-to-SQL generator,
//! the snapshot store, migration file handling, and project configuration
//! shared by the other Tabnit crates.

pub mod config;
pub mod diff;
pub mod error;
pub mod migration_file;
pub(crate) mod serde_helpers;
pub mod snapshot;
pub mod sql_gen;
pub mod sql_utils;

pub use config::{Config, EngineConfig};
pub use diff::{
    AlterTable, Column, ColumnModification, CreateTable, DefaultChange, DiffEntry, ForeignKey,
    SchemaDiff, TableChange,
};
pub use error::{CoreError, CoreResult};
pub use migration_file::{migration_filename, MigrationDir, MigrationFile};
pub use snapshot::SnapshotStore;
pub use sql_gen::{generate, statements};
