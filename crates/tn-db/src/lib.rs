//! tn-db - Database abstraction layer for Tabnit
//!
//! This crate provides the `Database` trait describing the transactional
//! contract the migration applier relies on, its DuckDB and PostgreSQL
//! implementations, and backend selection from a connection string.

pub mod connect;
pub mod duckdb;
pub mod error;
pub mod postgres;
pub mod traits;

pub use crate::connect::{connect, BackendKind};
pub use crate::duckdb::DuckDbBackend;
pub use crate::postgres::PostgresBackend;
pub use error::{DbError, DbResult};
pub use traits::{with_transaction, Database};
