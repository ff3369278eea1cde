#![cfg(feature = "web")]

use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use board::error::FetchError;
use board::fetcher::{RecordSource, RowFetcher, SheetSource};
use board::loader::{CsvMode, IdPolicy, ParseOptions};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::net::TcpListener;

const SHEET: &str = "Goals,Tasks,Team,Priority,Owner,Status,ETA,CompletionDate,Links,Notes\r\n\
\"Grow, retain\",Plan,Sales,High,Cara,Ongoing,2025-03-01,,https://example.com/plan,\r\n\
,,,,,,,,,\r\n\
Launch Y,Build,Eng,P1,Ben,Completed,2025-02-01,2025-02-10,,\r\n";

async fn export(
    State(hits): State<Arc<AtomicUsize>>,
    Path(document): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<String, StatusCode> {
    hits.fetch_add(1, Ordering::SeqCst);
    if params.get("format").map(String::as_str) != Some("csv") {
        return Err(StatusCode::BAD_REQUEST);
    }
    match (document.as_str(), params.get("gid").map(String::as_str)) {
        ("doc", Some("42")) => Ok(SHEET.to_string()),
        ("broken", _) => Err(StatusCode::INTERNAL_SERVER_ERROR),
        _ => Err(StatusCode::NOT_FOUND),
    }
}

/// Serve a fake sheet export on an ephemeral loopback port.
async fn spawn_sheet_server() -> SocketAddr {
    spawn_counted_sheet_server().await.0
}

/// Like `spawn_sheet_server`, also returning how many export requests arrived.
async fn spawn_counted_sheet_server() -> (SocketAddr, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .route("/d/:document/export", get(export))
        .with_state(hits.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    (addr, hits)
}

fn fetcher(addr: SocketAddr, document: &str, gid: &str, options: ParseOptions) -> RowFetcher {
    let source = SheetSource {
        base_url: format!("http://{}/d", addr),
        document_id: document.to_string(),
        sheet_gid: gid.to_string(),
    };
    RowFetcher::new(source, options, Duration::from_secs(5)).expect("client")
}

#[tokio::test]
async fn fetches_and_parses_naively_by_default() {
    let addr = spawn_sheet_server().await;
    let records = fetcher(addr, "doc", "42", ParseOptions::default())
        .fetch_records()
        .await
        .expect("records");

    assert_eq!(records.len(), 2);
    // Naive splitting breaks the quoted goal at its comma.
    assert_eq!(records[0].goals, "Grow");
    assert_eq!(records[0].tasks, "retain");
    assert_eq!(records[1].id, "3");
    assert_eq!(records[1].goals, "Launch Y");
}

#[tokio::test]
async fn quoted_mode_with_sequential_ids() {
    let addr = spawn_sheet_server().await;
    let options = ParseOptions {
        mode: CsvMode::Quoted,
        ids: IdPolicy::Sequential,
    };
    let records = fetcher(addr, "doc", "42", options)
        .fetch_records()
        .await
        .expect("records");

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, "1");
    assert_eq!(records[0].goals, "Grow, retain");
    assert_eq!(records[0].links, "https://example.com/plan");
    assert_eq!(records[1].id, "2");
    assert_eq!(records[1].status, "Completed");
}

#[tokio::test]
async fn non_success_status_is_a_fetch_error() {
    let addr = spawn_sheet_server().await;

    let err = fetcher(addr, "broken", "42", ParseOptions::default())
        .fetch_records()
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 500, .. }), "got {err}");

    let err = fetcher(addr, "doc", "7", ParseOptions::default())
        .fetch_records()
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn every_fetch_reads_the_source_again() {
    let (addr, hits) = spawn_counted_sheet_server().await;
    let fetcher = fetcher(addr, "doc", "42", ParseOptions::default());
    assert_eq!(hits.load(Ordering::SeqCst), 0);

    let first = fetcher.fetch_records().await.expect("first");
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    let second = fetcher.fetch_records().await.expect("second");
    assert_eq!(hits.load(Ordering::SeqCst), 2);
    assert_eq!(first, second);
}

#[tokio::test]
async fn failed_fetch_is_attempted_once() {
    let (addr, hits) = spawn_counted_sheet_server().await;

    let err = fetcher(addr, "broken", "42", ParseOptions::default())
        .fetch_records()
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}
