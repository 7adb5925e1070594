use super::*;
use clap::{CommandFactory, Parser};

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
fn test_positional_source_dir() {
    let cli = Cli::try_parse_from(["tabnit", "up", "db/schema"]).unwrap();
    match cli.command {
        Commands::Up(args) => assert_eq!(args.dir.as_deref(), Some("db/schema")),
        other => panic!("expected up, got {other:?}"),
    }

    let cli = Cli::try_parse_from(["tabnit", "init"]).unwrap();
    match cli.command {
        Commands::Init(args) => {
            assert!(args.dir.is_none());
            assert!(!args.force);
        }
        other => panic!("expected init, got {other:?}"),
    }
}

#[test]
fn test_global_args_after_subcommand() {
    let cli = Cli::try_parse_from([
        "tabnit",
        "apply",
        "--database-url",
        "duckdb://app.duckdb",
        "-p",
        "project",
        "--verbose",
    ])
    .unwrap();

    assert!(matches!(cli.command, Commands::Apply(_)));
    assert_eq!(
        cli.global.database_url.as_deref(),
        Some("duckdb://app.duckdb")
    );
    assert_eq!(cli.global.project_dir, "project");
    assert!(cli.global.verbose);
}

#[test]
fn test_sql_requires_input() {
    assert!(Cli::try_parse_from(["tabnit", "sql"]).is_err());
    let cli = Cli::try_parse_from(["tabnit", "sql", "-"]).unwrap();
    match cli.command {
        Commands::Sql(args) => assert_eq!(args.input, "-"),
        other => panic!("expected sql, got {other:?}"),
    }
}
