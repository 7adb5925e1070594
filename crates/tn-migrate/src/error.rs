//! Error types for tn-migrate

use thiserror::Error;
use tn_core::CoreError;
use tn_db::DbError;

/// Migration engine errors
#[derive(Error, Debug)]
pub enum MigrateError {
    /// No connection string was supplied (M001)
    #[error("[M001] DATABASE_URL environment variable is not set")]
    MissingDatabaseUrl,

    /// Tracking table could not be created or read (M002)
    #[error("[M002] Migration tracking table '{table}' unavailable: {source}")]
    TrackingTable {
        table: String,
        #[source]
        source: DbError,
    },

    /// A pending migration failed and was rolled back (M003)
    ///
    /// `applied` lists the files committed earlier in the same run.
    #[error("[M003] Failed to apply {file}: {source}")]
    ApplyFailed {
        file: String,
        applied: Vec<String>,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The schema engine program could not be started (M004)
    #[error("[M004] Failed to start schema engine '{program}': {source}")]
    EngineSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The schema engine exited unsuccessfully (M005)
    #[error("[M005] Schema engine `{command}` exited with {status}\nstdout:\n{stdout}\nstderr:\n{stderr}")]
    EngineFailed {
        command: String,
        status: String,
        stdout: String,
        stderr: String,
    },

    /// The schema engine printed something that is not the expected JSON (M006)
    #[error("[M006] Schema engine `{command}` produced unparseable output: {message}\noutput:\n{stdout}")]
    EngineOutput {
        command: String,
        message: String,
        stdout: String,
    },

    /// Core error (snapshot, migration files, config)
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Database error outside a migration transaction
    #[error(transparent)]
    Db(#[from] DbError),
}

/// Result type alias for MigrateError
pub type MigrateResult<T> = Result<T, MigrateError>;
