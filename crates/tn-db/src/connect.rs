//! Backend selection from a connection string

use crate::duckdb::DuckDbBackend;
use crate::error::DbResult;
use crate::postgres::PostgresBackend;
use crate::traits::Database;

/// Which backend a connection string selects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// `postgres://` or `postgresql://`
    Postgres,
    /// `duckdb://<path>`, `:memory:`, or a plain file path
    DuckDb,
}

impl BackendKind {
    /// Pick the backend by URL scheme. Anything without a PostgreSQL scheme
    /// is treated as a DuckDB target.
    pub fn from_url(url: &str) -> Self {
        let url = url.trim();
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            BackendKind::Postgres
        } else {
            BackendKind::DuckDb
        }
    }
}

/// Open a connection to the database named by `url`.
pub async fn connect(url: &str) -> DbResult<Box<dyn Database>> {
    let kind = BackendKind::from_url(url);
    log::debug!("Connecting to {:?} database", kind);
    match kind {
        BackendKind::Postgres => Ok(Box::new(PostgresBackend::connect(url.trim()).await?)),
        BackendKind::DuckDb => Ok(Box::new(DuckDbBackend::connect(url)?)),
    }
}

#[cfg(test)]
#[path = "connect_test.rs"]
mod tests;
