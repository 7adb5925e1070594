//! End-to-end tests for the `tabnit` binary.

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::{tempdir, TempDir};

fn tabnit_bin() -> String {
    env!("CARGO_BIN_EXE_tabnit").to_string()
}

/// Run `tabnit` in `project` and return (stdout, stderr, success).
fn run_tabnit(project: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(tabnit_bin())
        .arg("--project-dir")
        .arg(project)
        .args(args)
        .env_remove("DATABASE_URL")
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|e| panic!("Failed to execute tabnit with args {:?}: {}", args, e));
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.success(),
    )
}

/// Project whose schema engine is a shell script printing `schema.json`
/// for `snapshot` and `diff.json` for `diff`.
#[cfg(unix)]
fn scripted_project() -> TempDir {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::write(
        root.join("engine.sh"),
        format!(
            "case \"$1\" in\n  snapshot) cat '{schema}' ;;\n  diff) cat '{diff}' ;;\n  *) exit 2 ;;\nesac\n",
            schema = root.join("schema.json").display(),
            diff = root.join("diff.json").display(),
        ),
    )
    .unwrap();
    fs::write(
        root.join("tabnit.yml"),
        format!(
            "engine:\n  program: sh\n  args: [\"{}\"]\n",
            root.join("engine.sh").display()
        ),
    )
    .unwrap();
    fs::write(root.join("schema.json"), r#"{"tables": []}"#).unwrap();
    fs::write(root.join("diff.json"), "[]").unwrap();
    dir
}

fn migration_files(project: &Path) -> Vec<String> {
    match fs::read_dir(project.join("migrations")) {
        Ok(entries) => {
            let mut names: Vec<String> = entries
                .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
                .collect();
            names.sort();
            names
        }
        Err(_) => Vec::new(),
    }
}

#[cfg(unix)]
#[test]
fn test_init_up_apply_round() {
    let project = scripted_project();
    let root = project.path();

    let (_, stderr, ok) = run_tabnit(root, &["up"]);
    assert!(!ok, "up without a snapshot should fail");
    assert!(stderr.contains("E005"), "stderr: {stderr}");

    let (stdout, stderr, ok) = run_tabnit(root, &["init"]);
    assert!(ok, "init failed: {stderr}");
    assert!(stdout.contains("Baseline snapshot written"));
    assert!(root.join(".tabnit/snapshot.json").is_file());
    assert!(migration_files(root).is_empty());

    let (_, _, ok) = run_tabnit(root, &["init"]);
    assert!(!ok, "second init without --force should fail");

    let (stdout, _, ok) = run_tabnit(root, &["up"]);
    assert!(ok);
    assert!(stdout.contains("up to date"));
    assert!(migration_files(root).is_empty());

    fs::write(root.join("schema.json"), r#"{"tables": ["users"]}"#).unwrap();
    fs::write(
        root.join("diff.json"),
        r#"{"items": [{"create_table": {"table": "users", "columns": {"items": [
            {"name": "id", "data_type": "INTEGER", "nullable": false, "primary_key": true},
            {"name": "email", "data_type": "VARCHAR", "unique": true}
        ], "capacity": 2}, "primary_key_columns": []}}], "capacity": 1}"#,
    )
    .unwrap();

    let (stdout, stderr, ok) = run_tabnit(root, &["up"]);
    assert!(ok, "up failed: {stderr}");
    assert!(stdout.contains("Wrote"));
    let files = migration_files(root);
    assert_eq!(files.len(), 1);
    assert!(files[0].ends_with("_migration.sql"));
    assert_eq!(
        fs::read_to_string(root.join("migrations").join(&files[0])).unwrap(),
        "CREATE TABLE \"users\" (\n  \"id\" INTEGER NOT NULL PRIMARY KEY,\n  \"email\" VARCHAR UNIQUE\n);\n"
    );
    let snapshot = fs::read_to_string(root.join(".tabnit/snapshot.json")).unwrap();
    assert!(snapshot.contains("users"));

    let database = format!("duckdb://{}", root.join("app.duckdb").display());
    let (stdout, stderr, ok) = run_tabnit(root, &["apply", "--database-url", &database]);
    assert!(ok, "apply failed: {stderr}");
    assert!(stdout.contains(&format!("Applied {}", files[0])));

    let (stdout, _, ok) = run_tabnit(root, &["status", "--database-url", &database]);
    assert!(ok);
    assert!(stdout.contains("Applied (1):"));
    assert!(stdout.contains("Pending (0):"));
}

#[test]
fn test_apply_without_database_url_fails() {
    let dir = tempdir().unwrap();
    let (_, stderr, ok) = run_tabnit(dir.path(), &["apply"]);
    assert!(!ok);
    assert!(stderr.contains("DATABASE_URL"), "stderr: {stderr}");
}

#[test]
fn test_apply_without_migrations_dir() {
    let dir = tempdir().unwrap();
    let (stdout, _, ok) = run_tabnit(dir.path(), &["apply", "--database-url", ":memory:"]);
    assert!(ok);
    assert!(stdout.contains("No migrations directory found."));
}

#[test]
fn test_sql_renders_diff_file() {
    let dir = tempdir().unwrap();
    let diff = dir.path().join("diff.json");
    fs::write(
        &diff,
        r#"[{"alter_table": {"name": "users", "changes": [
            {"modify_column": {"name": "age", "type_changed": "bigint", "nullable_changed": false, "default_changed": null}}
        ]}}]"#,
    )
    .unwrap();

    let (stdout, stderr, ok) = run_tabnit(dir.path(), &["sql", diff.to_str().unwrap()]);
    assert!(ok, "sql failed: {stderr}");
    assert_eq!(
        stdout,
        "ALTER TABLE \"users\" ALTER COLUMN \"age\" TYPE bigint;\n\n\
         ALTER TABLE \"users\" ALTER COLUMN \"age\" SET NOT NULL;\n\n\
         ALTER TABLE \"users\" ALTER COLUMN \"age\" DROP DEFAULT;\n"
    );
}

#[test]
fn test_invalid_config_fails_before_work() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("tabnit.yml"), "unknown_key: 1\n").unwrap();
    let (_, stderr, ok) = run_tabnit(dir.path(), &["apply", "--database-url", ":memory:"]);
    assert!(!ok);
    assert!(stderr.contains("E002"), "stderr: {stderr}");
}
