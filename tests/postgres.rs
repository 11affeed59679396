//! Tests against a live PostgreSQL.
//!
//! Run with `DATABASE_URL=... cargo test --test postgres -- --ignored`.

use productseed::{
    connect_and_run, insert_products, DbParams, FailureKind, PgStore, ProductStore,
    ProductSynthesizer, RunError, RunOptionsBuilder,
};
use sqlx::postgres::PgConnectOptions;
use sqlx::{Connection, PgConnection};
use std::env;
use std::str::FromStr;

fn database_url() -> String {
    env::var("DATABASE_URL").expect("DATABASE_URL environment variable must be set")
}

fn connect_options(url: &str) -> PgConnectOptions {
    PgConnectOptions::from_str(url).expect("invalid DATABASE_URL")
}

async fn connect(url: &str) -> PgStore {
    PgStore::connect(&connect_options(url))
        .await
        .expect("Failed to connect to database")
}

fn params(url: String) -> DbParams {
    DbParams {
        database_url: Some(url),
        host: "localhost".into(),
        port: 5432,
        ..Default::default()
    }
}

/// Committed rows among `codes`, counted on a separate connection.
async fn stored_codes(url: &str, codes: &[String]) -> i64 {
    let mut conn = PgConnection::connect_with(&connect_options(url))
        .await
        .expect("Failed to connect to database");
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products WHERE code = ANY($1)")
        .bind(codes)
        .fetch_one(&mut conn)
        .await
        .unwrap();
    conn.close().await.unwrap();
    count
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn schema_creation_is_idempotent() {
    let mut store = connect(&database_url()).await;

    store.ensure_schema().await.unwrap();
    store.ensure_schema().await.unwrap();
    assert!(store.row_count().await.unwrap() >= 0);

    store.close().await.unwrap();
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn duplicate_codes_are_skipped() {
    let url = database_url();
    let mut store = connect(&url).await;
    store.ensure_schema().await.unwrap();

    let product = ProductSynthesizer::new().product().unwrap();
    let first = insert_products(&mut store, std::slice::from_ref(&product))
        .await
        .unwrap();
    let second = insert_products(&mut store, std::slice::from_ref(&product))
        .await
        .unwrap();

    assert_eq!(first.inserted, 1);
    assert_eq!(second.inserted, 0);
    assert_eq!(second.skipped, 1);
    store.close().await.unwrap();

    assert_eq!(stored_codes(&url, &[product.code]).await, 1);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn write_error_rolls_back_the_whole_batch() {
    let url = database_url();
    let mut store = connect(&url).await;
    store.ensure_schema().await.unwrap();

    let mut batch = ProductSynthesizer::new().products(10).unwrap();
    // VARCHAR(2)
    batch[4].origin_country = "TOOLONG".to_string();
    let codes: Vec<String> = batch.iter().map(|p| p.code.clone()).collect();

    let err = insert_products(&mut store, &batch).await.unwrap_err();

    assert_eq!(err.kind(), FailureKind::Write);
    assert!(matches!(err, RunError::Write { position: 5, .. }), "{err}");
    store.close().await.unwrap();

    // row_count is shared with concurrently running tests; count this batch instead
    assert_eq!(stored_codes(&url, &codes).await, 0);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn full_run_adds_the_whole_batch() {
    let url = database_url();

    let mut store = connect(&url).await;
    store.ensure_schema().await.unwrap();
    let before = store.row_count().await.unwrap();
    store.close().await.unwrap();

    let summary = connect_and_run(&params(url), &RunOptionsBuilder::new().build())
        .await
        .unwrap();

    assert_eq!(summary.inserted(), 250);
    // other tests may write to the same table concurrently
    assert!(summary.total_rows.unwrap() >= before + 250);
}

#[tokio::test]
async fn unreachable_server_is_a_connection_failure() {
    let params = DbParams {
        host: "127.0.0.1".into(),
        port: 1,
        user: Some("nobody".into()),
        dbname: Some("nowhere".into()),
        ..Default::default()
    };
    let err = connect_and_run(&params, &RunOptionsBuilder::new().num_records(1).build())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), FailureKind::Connection);
}
