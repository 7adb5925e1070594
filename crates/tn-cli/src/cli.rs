//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand};

/// Tabnit - snapshot a schema, generate safe migrations, and apply them
#[derive(Parser, Debug)]
#[command(name = "tabnit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Database connection string (`postgres://...`, `duckdb://<path>`, `:memory:`, or a file path)
    #[arg(long, env = "DATABASE_URL", global = true, hide_env_values = true)]
    pub database_url: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Capture the current schema as the baseline snapshot
    Init(InitArgs),

    /// Generate a migration for schema changes since the snapshot
    Up(UpArgs),

    /// Apply pending migrations to the database
    Apply(ApplyArgs),

    /// List applied and pending migrations
    Status(StatusArgs),

    /// Render a schema diff JSON document as SQL
    Sql(SqlArgs),
}

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Schema source directory passed to the schema engine (default: project directory)
    pub dir: Option<String>,

    /// Replace an existing snapshot
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the up command
#[derive(Args, Debug)]
pub struct UpArgs {
    /// Schema source directory passed to the schema engine (default: project directory)
    pub dir: Option<String>,
}

/// Arguments for the apply command
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Override the migrations directory
    #[arg(short, long)]
    pub migrations_dir: Option<String>,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Override the migrations directory
    #[arg(short, long)]
    pub migrations_dir: Option<String>,
}

/// Arguments for the sql command
#[derive(Args, Debug)]
pub struct SqlArgs {
    /// Diff JSON file, or `-` to read standard input
    pub input: String,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
