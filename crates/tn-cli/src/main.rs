//! Tabnit CLI - schema snapshots, generated migrations, transactional apply

use clap::Parser;

mod cli;
mod commands;

use cli::Cli;
use commands::common::ExitCode;
use commands::{apply, init, sql, status, up};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    let result = match &cli.command {
        cli::Commands::Init(args) => init::execute(args, &cli.global).await,
        cli::Commands::Up(args) => up::execute(args, &cli.global).await,
        cli::Commands::Apply(args) => apply::execute(args, &cli.global).await,
        cli::Commands::Status(args) => status::execute(args, &cli.global).await,
        cli::Commands::Sql(args) => sql::execute(args).await,
    };

    if let Err(err) = result {
        // Commands that already reported their failure only set the code.
        if let Some(ExitCode(code)) = err.downcast_ref::<ExitCode>() {
            std::process::exit(*code);
        }
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

/// Install the `env_logger` backend. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}
