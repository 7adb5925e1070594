//! External schema engine bridge
//!
//! Schema introspection and diffing happen in a separate program. The
//! workflow only needs two questions answered, so they sit behind the
//! [`SchemaEngine`] trait; [`CommandEngine`] answers them by running the
//! configured program as a subprocess and parsing its stdout.

use crate::error::{MigrateError, MigrateResult};
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::Path;
use tn_core::{EngineConfig, SchemaDiff};

/// Source of schema snapshots and diffs
#[async_trait]
pub trait SchemaEngine: Send + Sync {
    /// Observe the current schema defined under `source`.
    async fn snapshot(&self, source: &Path) -> MigrateResult<serde_json::Value>;

    /// Compute the changes from the stored snapshot at `snapshot` to the
    /// schema currently defined under `source`.
    async fn diff(&self, snapshot: &Path, source: &Path) -> MigrateResult<SchemaDiff>;
}

/// Schema engine backed by an external program
///
/// Invocations:
/// - `<program> [args..] snapshot <source>` prints the schema JSON
/// - `<program> [args..] diff <snapshot> <source>` prints the diff JSON
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandEngine {
    program: String,
    args: Vec<String>,
}

/// Captured result of one engine invocation
struct EngineOutput {
    command: String,
    stdout: String,
}

impl CommandEngine {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.program.clone(), config.args.clone())
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Human-readable command line, used in error messages.
    fn describe(&self, extra: &[OsString]) -> String {
        let mut parts = Vec::with_capacity(1 + self.args.len() + extra.len());
        parts.push(self.program.clone());
        parts.extend(self.args.iter().cloned());
        parts.extend(extra.iter().map(|a| a.to_string_lossy().into_owned()));
        parts.join(" ")
    }

    async fn run(&self, extra: Vec<OsString>) -> MigrateResult<EngineOutput> {
        let command = self.describe(&extra);
        log::debug!("Running schema engine: {}", command);

        let output = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .args(&extra)
            .stdin(std::process::Stdio::null())
            .output()
            .await
            .map_err(|source| MigrateError::EngineSpawn {
                program: self.program.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(MigrateError::EngineFailed {
                command,
                status: output.status.to_string(),
                stdout,
                stderr,
            });
        }

        if !stderr.trim().is_empty() {
            log::debug!("Schema engine stderr:\n{}", stderr.trim_end());
        }

        Ok(EngineOutput { command, stdout })
    }
}

#[async_trait]
impl SchemaEngine for CommandEngine {
    async fn snapshot(&self, source: &Path) -> MigrateResult<serde_json::Value> {
        let out = self
            .run(vec!["snapshot".into(), source.as_os_str().to_owned()])
            .await?;

        serde_json::from_str(&out.stdout).map_err(|e| MigrateError::EngineOutput {
            command: out.command,
            message: e.to_string(),
            stdout: out.stdout,
        })
    }

    async fn diff(&self, snapshot: &Path, source: &Path) -> MigrateResult<SchemaDiff> {
        let out = self
            .run(vec![
                "diff".into(),
                snapshot.as_os_str().to_owned(),
                source.as_os_str().to_owned(),
            ])
            .await?;

        SchemaDiff::from_json(&out.stdout).map_err(|e| MigrateError::EngineOutput {
            command: out.command,
            message: e.to_string(),
            stdout: out.stdout,
        })
    }
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
