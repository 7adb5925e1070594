//! PostgreSQL database backend implementation

use crate::error::{DbError, DbResult};
use crate::traits::Database;
use async_trait::async_trait;
use sqlx::{Connection, PgConnection};
use tn_core::sql_utils::quote_ident;
use tokio::sync::Mutex;

/// PostgreSQL database backend
///
/// Holds a single connection rather than a pool: `BEGIN`, the migration
/// statements, and `COMMIT` must all run on the same session.
pub struct PostgresBackend {
    conn: Mutex<PgConnection>,
}

impl PostgresBackend {
    /// Connect using a `postgres://` or `postgresql://` URL
    pub async fn connect(url: &str) -> DbResult<Self> {
        let conn = PgConnection::connect(url)
            .await
            .map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    async fn run_raw(&self, sql: &str) -> Result<(), sqlx::Error> {
        let mut conn = self.conn.lock().await;
        sqlx::raw_sql(sql).execute(&mut *conn).await?;
        Ok(())
    }

    async fn transaction_control(&self, statement: &str) -> DbResult<()> {
        self.run_raw(statement)
            .await
            .map_err(|e| DbError::TransactionError(format!("{}: {}", statement, e)))
    }
}

#[async_trait]
impl Database for PostgresBackend {
    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        // Simple-query protocol, so a file may hold many statements.
        self.run_raw(sql)
            .await
            .map_err(|e| DbError::ExecutionError(e.to_string()))
    }

    async fn execute_with_text(&self, sql: &str, value: &str) -> DbResult<usize> {
        let mut conn = self.conn.lock().await;
        let result = sqlx::query(sql)
            .bind(value)
            .execute(&mut *conn)
            .await
            .map_err(|e| DbError::ExecutionError(format!("{}: {}", e, sql)))?;
        Ok(result.rows_affected() as usize)
    }

    async fn query_strings(&self, sql: &str) -> DbResult<Vec<String>> {
        let mut conn = self.conn.lock().await;
        let values = sqlx::query_scalar::<_, String>(sql)
            .fetch_all(&mut *conn)
            .await?;
        Ok(values)
    }

    async fn query_count(&self, sql: &str) -> DbResult<usize> {
        let counted = format!("SELECT COUNT(*) FROM ({}) AS counted", sql);
        let mut conn = self.conn.lock().await;
        let count = sqlx::query_scalar::<_, i64>(&counted)
            .fetch_one(&mut *conn)
            .await?;
        Ok(count as usize)
    }

    async fn relation_exists(&self, name: &str) -> DbResult<bool> {
        // Unqualified names resolve against the session's current schema
        let (schema, table) = match name.rfind('.') {
            Some(pos) => (Some(&name[..pos]), &name[pos + 1..]),
            None => (None, name),
        };

        let mut conn = self.conn.lock().await;
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM information_schema.tables \
             WHERE table_schema = COALESCE($1::text, current_schema()) AND table_name = $2",
        )
        .bind(schema)
        .bind(table)
        .fetch_one(&mut *conn)
        .await?;

        Ok(count > 0)
    }

    async fn create_tracking_table(&self, table: &str) -> DbResult<()> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                 id         SERIAL PRIMARY KEY,
                 name       TEXT NOT NULL UNIQUE,
                 applied_at TIMESTAMPTZ NOT NULL DEFAULT now()
             );",
            quote_ident(table)
        );
        self.execute_batch(&sql).await
    }

    async fn begin(&self) -> DbResult<()> {
        self.transaction_control("BEGIN").await
    }

    async fn commit(&self) -> DbResult<()> {
        self.transaction_control("COMMIT").await
    }

    async fn rollback(&self) -> DbResult<()> {
        self.transaction_control("ROLLBACK").await
    }

    fn db_type(&self) -> &'static str {
        "postgres"
    }
}

#[cfg(test)]
#[path = "postgres_test.rs"]
mod tests;
