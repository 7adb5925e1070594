use super::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;
use tn_db::{Database, DuckDbBackend};

fn global(project_dir: &Path, database: &Path) -> GlobalArgs {
    GlobalArgs {
        verbose: false,
        project_dir: project_dir.display().to_string(),
        config: None,
        database_url: Some(format!("duckdb://{}", database.display())),
    }
}

fn no_override() -> ApplyArgs {
    ApplyArgs {
        migrations_dir: None,
    }
}

async fn recorded(database: &Path) -> Vec<String> {
    let db = DuckDbBackend::from_path(database).unwrap();
    db.query_strings("SELECT name FROM \"tabnit_migrations\" ORDER BY name")
        .await
        .unwrap()
}

#[tokio::test]
async fn test_apply_records_every_file() {
    let dir = tempdir().unwrap();
    let migrations = dir.path().join("migrations");
    fs::create_dir_all(&migrations).unwrap();
    fs::write(
        migrations.join("20240101000000_migration.sql"),
        "CREATE TABLE \"users\" (\n  \"id\" INTEGER NOT NULL PRIMARY KEY\n);\n",
    )
    .unwrap();
    fs::write(
        migrations.join("20240102000000_migration.sql"),
        "ALTER TABLE \"users\" ADD COLUMN \"email\" VARCHAR;\n",
    )
    .unwrap();
    let database = dir.path().join("app.duckdb");

    execute(&no_override(), &global(dir.path(), &database))
        .await
        .unwrap();
    assert_eq!(
        recorded(&database).await,
        vec![
            "20240101000000_migration.sql".to_string(),
            "20240102000000_migration.sql".to_string(),
        ]
    );

    // Second run has nothing to do.
    execute(&no_override(), &global(dir.path(), &database))
        .await
        .unwrap();
    assert_eq!(recorded(&database).await.len(), 2);
}

#[tokio::test]
async fn test_apply_failure_sets_exit_code() {
    let dir = tempdir().unwrap();
    let migrations = dir.path().join("migrations");
    fs::create_dir_all(&migrations).unwrap();
    fs::write(migrations.join("001.sql"), "CREATE TABLE a (id INTEGER);").unwrap();
    fs::write(migrations.join("002.sql"), "SELECT * FROM missing;").unwrap();
    let database = dir.path().join("app.duckdb");

    let err = execute(&no_override(), &global(dir.path(), &database))
        .await
        .unwrap_err();
    assert_eq!(err.downcast_ref::<ExitCode>().map(|c| c.0), Some(1));
    assert_eq!(recorded(&database).await, vec!["001.sql".to_string()]);
}

#[tokio::test]
async fn test_missing_database_url_is_error() {
    let dir = tempdir().unwrap();
    let mut args = global(dir.path(), &dir.path().join("app.duckdb"));
    args.database_url = None;

    let err = execute(&no_override(), &args).await.unwrap_err();
    assert!(err.to_string().contains("M001"));
}

#[tokio::test]
async fn test_migrations_dir_override() {
    let dir = tempdir().unwrap();
    let elsewhere = dir.path().join("elsewhere");
    fs::create_dir_all(&elsewhere).unwrap();
    fs::write(elsewhere.join("001.sql"), "CREATE TABLE a (id INTEGER);").unwrap();
    let database = dir.path().join("app.duckdb");

    let args = ApplyArgs {
        migrations_dir: Some(elsewhere.display().to_string()),
    };
    execute(&args, &global(dir.path(), &database)).await.unwrap();
    assert_eq!(recorded(&database).await, vec!["001.sql".to_string()]);
}
