//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::traits::Database;
use async_trait::async_trait;
use duckdb::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tn_core::sql_utils::quote_ident;

/// URL scheme accepted in front of a DuckDB path
const URL_SCHEME: &str = "duckdb://";

/// DuckDB database backend
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{}: {}", e, path.display())))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Connect using a connection string
    ///
    /// Accepts `:memory:`, a plain file path, or `duckdb://<path>`
    /// (`duckdb://` alone or `duckdb://:memory:` open an in-memory database).
    pub fn connect(url: &str) -> DbResult<Self> {
        let target = url.strip_prefix(URL_SCHEME).unwrap_or(url).trim();
        match target {
            "" | ":memory:" => Self::in_memory(),
            path => Self::from_path(Path::new(path)),
        }
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    fn execute_batch_sync(&self, sql: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(sql)
            .map_err(|e| DbError::ExecutionError(e.to_string()))
    }

    fn transaction_control(&self, statement: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(statement)
            .map_err(|e| DbError::TransactionError(format!("{}: {}", statement, e)))
    }

    fn execute_with_text_sync(&self, sql: &str, value: &str) -> DbResult<usize> {
        let conn = self.lock()?;
        conn.execute(sql, duckdb::params![value])
            .map_err(|e| DbError::ExecutionError(format!("{}: {}", e, sql)))
    }

    fn query_strings_sync(&self, sql: &str) -> DbResult<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut values = Vec::new();
        for row in rows {
            values.push(row?);
        }
        Ok(values)
    }

    fn query_count_sync(&self, sql: &str) -> DbResult<usize> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM ({})", sql), [], |row| {
                row.get(0)
            })
            .map_err(|e| DbError::ExecutionError(e.to_string()))?;
        Ok(count as usize)
    }

    fn relation_exists_sync(&self, name: &str) -> DbResult<bool> {
        let conn = self.lock()?;

        // Handle schema-qualified names
        let (schema, table) = match name.rfind('.') {
            Some(pos) => (&name[..pos], &name[pos + 1..]),
            None => ("main", name),
        };

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM information_schema.tables \
                 WHERE table_schema = ? AND table_name = ?",
                duckdb::params![schema, table],
                |row| row.get(0),
            )
            .map_err(|e| DbError::ExecutionError(e.to_string()))?;

        Ok(count > 0)
    }
}

#[async_trait]
impl Database for DuckDbBackend {
    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.execute_batch_sync(sql)
    }

    async fn execute_with_text(&self, sql: &str, value: &str) -> DbResult<usize> {
        self.execute_with_text_sync(sql, value)
    }

    async fn query_strings(&self, sql: &str) -> DbResult<Vec<String>> {
        self.query_strings_sync(sql)
    }

    async fn query_count(&self, sql: &str) -> DbResult<usize> {
        self.query_count_sync(sql)
    }

    async fn relation_exists(&self, name: &str) -> DbResult<bool> {
        self.relation_exists_sync(name)
    }

    async fn create_tracking_table(&self, table: &str) -> DbResult<()> {
        // DuckDB has no SERIAL; the id default comes from a sequence.
        // nextval parses its argument as a name, so it gets the same quoting.
        let sequence = quote_ident(&format!("{}_id_seq", table));
        let sql = format!(
            "CREATE SEQUENCE IF NOT EXISTS {seq} START 1;
             CREATE TABLE IF NOT EXISTS {table} (
                 id         INTEGER PRIMARY KEY DEFAULT nextval('{seq_literal}'),
                 name       VARCHAR NOT NULL UNIQUE,
                 applied_at TIMESTAMP NOT NULL DEFAULT now()
             );",
            seq = sequence,
            table = quote_ident(table),
            seq_literal = sequence.replace('\'', "''"),
        );
        self.execute_batch_sync(&sql)
    }

    async fn begin(&self) -> DbResult<()> {
        self.transaction_control("BEGIN TRANSACTION")
    }

    async fn commit(&self) -> DbResult<()> {
        self.transaction_control("COMMIT")
    }

    async fn rollback(&self) -> DbResult<()> {
        self.transaction_control("ROLLBACK")
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
