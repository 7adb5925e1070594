//! Database trait definition

use crate::error::{DbError, DbResult};
use async_trait::async_trait;
use std::future::Future;

/// Database abstraction trait for Tabnit
///
/// Implementations must be Send + Sync for async operation. A value of this
/// trait is one scoped connection: dropping it releases the connection.
#[async_trait]
pub trait Database: Send + Sync {
    /// Execute one or more SQL statements as a single call
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Execute a statement with one bound text parameter (`$1` placeholder),
    /// returns affected rows
    async fn execute_with_text(&self, sql: &str, value: &str) -> DbResult<usize>;

    /// Run a query and collect its first column as strings
    async fn query_strings(&self, sql: &str) -> DbResult<Vec<String>>;

    /// Execute query returning row count
    async fn query_count(&self, sql: &str) -> DbResult<usize>;

    /// Check if a table or view exists
    async fn relation_exists(&self, name: &str) -> DbResult<bool>;

    /// Create the applied-migration ledger `table` if it does not exist
    ///
    /// Columns: auto-increment `id`, unique `name`, and `applied_at`
    /// defaulting to the current time.
    async fn create_tracking_table(&self, table: &str) -> DbResult<()>;

    /// Start a transaction
    async fn begin(&self) -> DbResult<()>;

    /// Commit the open transaction
    async fn commit(&self) -> DbResult<()>;

    /// Roll back the open transaction
    async fn rollback(&self) -> DbResult<()>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}

/// Execute `body` within a `BEGIN` / `COMMIT` transaction, rolling back on
/// error.
///
/// The error returned by `body` is passed through unchanged. A failed
/// `COMMIT` is rolled back and reported as [`DbError::TransactionError`].
pub async fn with_transaction<'a, T, F, Fut>(db: &'a dyn Database, body: F) -> DbResult<T>
where
    F: FnOnce(&'a dyn Database) -> Fut,
    Fut: Future<Output = DbResult<T>>,
{
    db.begin().await?;

    match body(db).await {
        Ok(value) => {
            if let Err(commit_err) = db.commit().await {
                if let Err(rollback_err) = db.rollback().await {
                    log::debug!("ROLLBACK after failed COMMIT also failed: {rollback_err}");
                }
                return Err(DbError::TransactionError(format!(
                    "COMMIT failed: {commit_err}"
                )));
            }
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = db.rollback().await {
                log::warn!("ROLLBACK failed: {rollback_err}");
            }
            Err(err)
        }
    }
}
