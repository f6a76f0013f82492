use quackgate::GatewayError;
use quackgate::db::{DatabaseTarget, TableName};
use quackgate_schema::{CellValue, IngestRecord};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

fn record(pairs: &[(&str, &str)]) -> IngestRecord {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn text(s: &str) -> CellValue {
    CellValue::Text(s.to_string())
}

#[tokio::test]
async fn test_db_actor_ingest_and_query_baseline() {
    let db = quackgate::db::spawn(&DatabaseTarget::InMemory)
        .await
        .expect("failed to open in-memory database");
    db.ping().await.expect("ping failed");

    let users = TableName::parse("users").unwrap();

    // 1. First ingest creates the table and inserts one row
    db.ingest(users.clone(), record(&[("name", "Alice"), ("role", "admin")]))
        .await
        .unwrap();

    let rows = db.query_map_rows("SELECT * FROM users").await.unwrap();
    assert_eq!(rows.len(), 1, "Expected exactly one row after first ingest");
    assert_eq!(rows[0].data.len(), 2);
    assert_eq!(rows[0].data["name"], text("Alice"));
    assert_eq!(rows[0].data["role"], text("admin"));

    // 2. A second ingest appends; table creation is idempotent
    db.ingest(users.clone(), record(&[("name", "Bob")]))
        .await
        .unwrap();

    let rows = db
        .query_map_rows("SELECT data FROM users ORDER BY data['name']")
        .await
        .unwrap();
    assert_eq!(rows.len(), 2, "Expected ingest to append, not upsert");
    assert_eq!(rows[1].data["name"], text("Bob"));
    assert!(!rows[1].data.contains_key("role"));

    db.close().await.unwrap();
}

#[tokio::test]
async fn test_db_actor_binds_values_with_quotes() {
    let db = quackgate::db::spawn(&DatabaseTarget::InMemory).await.unwrap();
    let notes = TableName::parse("notes").unwrap();

    let tricky = record(&[
        ("author", "O'Brien"),
        ("body", "'); DROP TABLE notes; --"),
        ("it's", "a key with a quote"),
    ]);
    db.ingest(notes, tricky.clone()).await.unwrap();

    let rows = db.query_map_rows("SELECT * FROM notes").await.unwrap();
    assert_eq!(rows.len(), 1);
    for (key, value) in &tricky {
        assert_eq!(rows[0].data[key], text(value));
    }

    db.close().await.unwrap();
}

#[tokio::test]
async fn test_db_actor_converts_non_text_map_values() {
    let db = quackgate::db::spawn(&DatabaseTarget::InMemory).await.unwrap();

    let rows = db
        .query_map_rows("SELECT MAP {'n': 42} UNION ALL SELECT MAP {'n': 7}")
        .await
        .unwrap();
    let mut values: Vec<_> = rows.iter().map(|row| row.data["n"].clone()).collect();
    values.sort_by_key(|v| match v {
        CellValue::Int(n) => *n,
        other => panic!("expected integer, got {other:?}"),
    });
    assert_eq!(values, vec![CellValue::Int(7), CellValue::Int(42)]);

    db.close().await.unwrap();
}

#[tokio::test]
async fn test_db_actor_rejects_rows_that_are_not_string_keyed_maps() {
    let db = quackgate::db::spawn(&DatabaseTarget::InMemory).await.unwrap();

    // Scalar column
    let err = db.query_map_rows("SELECT 1 AS n").await.unwrap_err();
    assert!(matches!(err, GatewayError::DataShape(_)), "got {err:?}");

    // Two columns
    let err = db
        .query_map_rows("SELECT MAP {'a': 'b'} AS m, 1 AS n")
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::DataShape(_)), "got {err:?}");

    // Integer keys
    let err = db
        .query_map_rows("SELECT MAP {1: 'one', 2: 'two'}")
        .await
        .unwrap_err();
    match err {
        GatewayError::DataShape(msg) => assert_eq!(msg, "Data error"),
        other => panic!("expected DataShape, got {other:?}"),
    }

    // Zero rows is not an error, whatever the shape
    let rows = db.query_map_rows("SELECT 1 WHERE false").await.unwrap();
    assert!(rows.is_empty());

    db.close().await.unwrap();
}

#[tokio::test]
async fn test_db_actor_surfaces_engine_errors() {
    let db = quackgate::db::spawn(&DatabaseTarget::InMemory).await.unwrap();

    let err = db.query_map_rows("SELEC nonsense").await.unwrap_err();
    match &err {
        GatewayError::Execution(_) => {
            assert!(err.to_string().contains("syntax error"), "got {err}")
        }
        other => panic!("expected Execution, got {other:?}"),
    }

    let err = db
        .query_map_rows("SELECT * FROM missing_table")
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Execution(_)), "got {err:?}");

    db.close().await.unwrap();
}

#[tokio::test]
async fn test_db_actor_file_database_persists_across_reopen() {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!(
        "quackgate-db-actor-{}-{}.duckdb",
        std::process::id(),
        nanos
    ));
    let target = DatabaseTarget::File(path.clone());

    let db = quackgate::db::spawn(&target).await.unwrap();
    db.ingest(TableName::parse("kv").unwrap(), record(&[("k", "v")]))
        .await
        .unwrap();
    db.close().await.unwrap();

    let db = quackgate::db::spawn(&target).await.unwrap();
    let rows = db.query_map_rows("SELECT * FROM kv").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].data["k"], text("v"));
    db.close().await.unwrap();

    let _ = std::fs::remove_file(&path);
    let _ = std::fs::remove_file(path.with_extension("duckdb.wal"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_db_actor_slow_query_does_not_hold_other_calls() {
    let db = quackgate::db::spawn(&DatabaseTarget::InMemory).await.unwrap();

    let slow_db = db.clone();
    let slow = tokio::spawn(async move {
        slow_db
            .query_map_rows(
                "SELECT MAP {'n': CAST(count(*) AS VARCHAR)} FROM range(2000000000)",
            )
            .await
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    // Both calls complete while the scan is still running.
    let fast = TableName::parse("fast").unwrap();
    db.ingest(fast, record(&[("k", "v")])).await.unwrap();
    db.ping().await.unwrap();
    assert!(!slow.is_finished(), "ingest waited for the slow query");

    let rows = slow.await.unwrap().unwrap();
    assert_eq!(rows[0].data["n"], text("2000000000"));

    let rows = db.query_map_rows("SELECT data FROM fast").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].data["k"], text("v"));

    db.close().await.unwrap();
}

#[tokio::test]
async fn test_db_actor_empty_statement_is_rejected() {
    let db = quackgate::db::spawn(&DatabaseTarget::InMemory).await.unwrap();

    for sql in ["", "  \n\t"] {
        let err = db.query_map_rows(sql).await.unwrap_err();
        assert!(matches!(err, GatewayError::EmptyStatement), "got {err:?}");
    }

    db.close().await.unwrap();
}

#[tokio::test]
async fn test_db_actor_calls_after_close_fail() {
    let db = quackgate::db::spawn(&DatabaseTarget::InMemory).await.unwrap();
    let other = db.clone();
    db.close().await.unwrap();

    let err = other.ping().await.unwrap_err();
    assert!(matches!(err, GatewayError::Actor(_)), "got {err:?}");
}

#[tokio::test]
async fn test_db_spawn_fails_for_unopenable_path() {
    let mut path = std::env::temp_dir();
    path.push("quackgate-no-such-dir");
    path.push("nested");
    path.push("gate.duckdb");

    match quackgate::db::spawn(&DatabaseTarget::File(path)).await {
        Err(GatewayError::Connection(_)) => {}
        Err(other) => panic!("expected Connection error, got {other:?}"),
        Ok(_) => panic!("expected spawn to fail"),
    }
}
