use super::*;
use crate::traits::with_transaction;

#[tokio::test]
async fn test_in_memory() {
    let db = DuckDbBackend::in_memory().unwrap();
    assert_eq!(db.db_type(), "duckdb");
}

#[tokio::test]
async fn test_connect_url_forms() {
    assert!(DuckDbBackend::connect(":memory:").is_ok());
    assert!(DuckDbBackend::connect("duckdb://").is_ok());
    assert!(DuckDbBackend::connect("duckdb://:memory:").is_ok());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.duckdb");
    let db = DuckDbBackend::connect(&format!("duckdb://{}", path.display())).unwrap();
    db.execute_batch("CREATE TABLE t (id INTEGER)").await.unwrap();
    drop(db);
    assert!(path.exists());

    let reopened = DuckDbBackend::connect(path.to_str().unwrap()).unwrap();
    assert!(reopened.relation_exists("t").await.unwrap());
}

#[tokio::test]
async fn test_execute_batch_multiple_statements() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch(
        "CREATE TABLE t1 (id INT); CREATE TABLE t2 (id INT); INSERT INTO t1 VALUES (1);",
    )
    .await
    .unwrap();

    assert!(db.relation_exists("t1").await.unwrap());
    assert!(db.relation_exists("t2").await.unwrap());
    assert_eq!(db.query_count("SELECT * FROM t1").await.unwrap(), 1);
}

#[tokio::test]
async fn test_execute_with_text_binds_value() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE names (name VARCHAR)")
        .await
        .unwrap();

    let affected = db
        .execute_with_text("INSERT INTO names (name) VALUES ($1)", "it's quoted")
        .await
        .unwrap();
    assert_eq!(affected, 1);

    let names = db.query_strings("SELECT name FROM names").await.unwrap();
    assert_eq!(names, vec!["it's quoted".to_string()]);
}

#[tokio::test]
async fn test_relation_exists_with_schema() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE SCHEMA staging; CREATE TABLE staging.orders (id INT)")
        .await
        .unwrap();

    assert!(db.relation_exists("staging.orders").await.unwrap());
    assert!(!db.relation_exists("orders").await.unwrap());
    assert!(!db.relation_exists("nonexistent").await.unwrap());
}

#[tokio::test]
async fn test_transaction_commits() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE t (id INT)").await.unwrap();

    with_transaction(&db, |db| async move {
        db.execute_batch("INSERT INTO t VALUES (1); INSERT INTO t VALUES (2);")
            .await
    })
    .await
    .unwrap();

    assert_eq!(db.query_count("SELECT * FROM t").await.unwrap(), 2);
}

#[tokio::test]
async fn test_transaction_rolls_back_on_error() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE t (id INT)").await.unwrap();

    let result = with_transaction(&db, |db| async move {
        db.execute_batch("INSERT INTO t VALUES (1); CREATE TABLE t2 (id INT);")
            .await?;
        db.execute_batch("INSERT INTO missing_table VALUES (1)").await
    })
    .await;

    assert!(matches!(result, Err(DbError::ExecutionError(_))));
    assert_eq!(db.query_count("SELECT * FROM t").await.unwrap(), 0);
    assert!(!db.relation_exists("t2").await.unwrap());

    // Connection is usable again after the rollback.
    db.execute_batch("INSERT INTO t VALUES (3)").await.unwrap();
    assert_eq!(db.query_count("SELECT * FROM t").await.unwrap(), 1);
}

#[tokio::test]
async fn test_commit_without_begin_fails() {
    let db = DuckDbBackend::in_memory().unwrap();
    assert!(matches!(
        db.commit().await,
        Err(DbError::TransactionError(_))
    ));
}

#[tokio::test]
async fn test_create_tracking_table_is_idempotent() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.create_tracking_table("tabnit_migrations").await.unwrap();
    db.create_tracking_table("tabnit_migrations").await.unwrap();

    assert!(db.relation_exists("tabnit_migrations").await.unwrap());

    db.execute_with_text(
        "INSERT INTO \"tabnit_migrations\" (name) VALUES ($1)",
        "20240101000000_migration.sql",
    )
    .await
    .unwrap();
    db.execute_with_text(
        "INSERT INTO \"tabnit_migrations\" (name) VALUES ($1)",
        "20240102000000_migration.sql",
    )
    .await
    .unwrap();

    let ids = db
        .query_strings("SELECT CAST(id AS VARCHAR) FROM \"tabnit_migrations\" ORDER BY id")
        .await
        .unwrap();
    assert_eq!(ids, vec!["1".to_string(), "2".to_string()]);
    assert_eq!(
        db.query_count("SELECT * FROM \"tabnit_migrations\" WHERE applied_at IS NOT NULL")
            .await
            .unwrap(),
        2
    );
}

#[tokio::test]
async fn test_tracking_table_rejects_duplicate_names() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.create_tracking_table("ledger").await.unwrap();

    let insert = "INSERT INTO \"ledger\" (name) VALUES ($1)";
    db.execute_with_text(insert, "a.sql").await.unwrap();
    assert!(db.execute_with_text(insert, "a.sql").await.is_err());
}

#[tokio::test]
async fn test_tracking_table_name_with_dot_and_quote() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.create_tracking_table("audit.o'log").await.unwrap();
    db.create_tracking_table("audit.o'log").await.unwrap();

    let insert = "INSERT INTO \"audit.o'log\" (name) VALUES ($1)";
    db.execute_with_text(insert, "001.sql").await.unwrap();
    db.execute_with_text(insert, "002.sql").await.unwrap();

    let ids = db
        .query_strings("SELECT CAST(id AS VARCHAR) FROM \"audit.o'log\" ORDER BY id")
        .await
        .unwrap();
    assert_eq!(ids, vec!["1".to_string(), "2".to_string()]);
}
