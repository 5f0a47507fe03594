mod common;

use std::sync::atomic::Ordering;

use axum::http::StatusCode;
use musicrawl::{
    Error,
    management::{MemoryBackend, MemoryCredentialStore, RecordStore},
    pipeline::{self, Pipeline},
    types::Track,
};

use common::{client, envelope, fake_spotify, fixed_response, item, spawn};

fn track(id: &str, name: &str, artist_id: &str) -> Track {
    Track {
        id: id.to_string(),
        name: name.to_string(),
        artist_id: artist_id.to_string(),
        genre: String::new(),
    }
}

#[tokio::test]
async fn test_run_fetches_persists_and_reports_single_track() {
    let (app, hits) = fake_spotify("tok1", envelope(vec![item("t1", "Song", &["a1"])]), "{}");
    let spotify = client(&spawn(app).await);
    let credentials = MemoryCredentialStore::new("Access Token: tok1\nRefresh Token: r1\n");
    let mut store = RecordStore::new(MemoryBackend::new(), 10);
    let mut out: Vec<u8> = Vec::new();

    let summary = Pipeline::new(&mut store, &credentials, &spotify)
        .run(&mut out)
        .await
        .unwrap();

    let expected = track("t1", "Song", "a1");
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(summary.fetched, 1);
    assert_eq!(summary.persisted, 1);
    assert!(summary.failed.is_empty());
    assert_eq!(
        summary.report.records,
        vec![("t1".to_string(), expected.clone())]
    );
    assert!(summary.report.anomalies.is_empty());

    assert_eq!(store.backend().len(), 1);
    assert_eq!(store.get("t1").await.unwrap(), Some(expected));

    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("t1"));
    assert!(printed.contains("Song"));
    assert!(printed.contains("a1"));
}

#[tokio::test]
async fn test_run_report_includes_records_from_earlier_runs() {
    let (app, _) = fake_spotify("tok", envelope(vec![item("new", "New Song", &["a"])]), "{}");
    let spotify = client(&spawn(app).await);
    let credentials = MemoryCredentialStore::new("Access Token: tok\n");
    let mut store = RecordStore::new(MemoryBackend::new(), 10);
    store.put("old", &track("old", "Old Song", "b")).await.unwrap();
    let mut out: Vec<u8> = Vec::new();

    let summary = Pipeline::new(&mut store, &credentials, &spotify)
        .run(&mut out)
        .await
        .unwrap();

    let mut keys: Vec<&str> = summary
        .report
        .records
        .iter()
        .map(|(key, _)| key.as_str())
        .collect();
    keys.sort();
    assert_eq!(keys, vec!["new", "old"]);
    assert!(String::from_utf8(out).unwrap().contains("Old Song"));
}

#[tokio::test]
async fn test_run_rerun_overwrites_instead_of_duplicating() {
    let (app, _) = fake_spotify("tok", envelope(vec![item("t1", "Renamed", &["a2"])]), "{}");
    let spotify = client(&spawn(app).await);
    let credentials = MemoryCredentialStore::new("Access Token: tok\n");
    let mut store = RecordStore::new(MemoryBackend::new(), 10);
    store.put("t1", &track("t1", "Original", "a1")).await.unwrap();

    Pipeline::new(&mut store, &credentials, &spotify)
        .run(&mut std::io::sink())
        .await
        .unwrap();

    assert_eq!(store.backend().len(), 1);
    assert_eq!(
        store.get("t1").await.unwrap(),
        Some(track("t1", "Renamed", "a2"))
    );
}

#[tokio::test]
async fn test_run_continues_after_single_persist_failure() {
    let body = envelope(vec![
        item("t1", "One", &["a"]),
        item("t2", "Two", &["b"]),
        item("t3", "Three", &["c"]),
    ]);
    let (app, _) = fake_spotify("tok", body, "{}");
    let spotify = client(&spawn(app).await);
    let credentials = MemoryCredentialStore::new("Access Token: tok\n");
    let mut backend = MemoryBackend::new();
    backend.fail_writes_for("t2");
    let mut store = RecordStore::new(backend, 10);

    let summary = Pipeline::new(&mut store, &credentials, &spotify)
        .run(&mut std::io::sink())
        .await
        .unwrap();

    assert_eq!(summary.fetched, 3);
    assert_eq!(summary.persisted, 2);
    assert_eq!(summary.failed, vec!["t2".to_string()]);
    assert_eq!(summary.report.records.len(), 2);
    assert!(store.get("t3").await.unwrap().is_some());
}

#[tokio::test]
async fn test_run_without_token_stops_before_fetch() {
    let (app, hits) = fake_spotify("tok", envelope(vec![item("t1", "Song", &["a1"])]), "{}");
    let spotify = client(&spawn(app).await);
    let credentials = MemoryCredentialStore::new("Refresh Token: r1\n");
    let mut store = RecordStore::new(MemoryBackend::new(), 10);
    let mut out: Vec<u8> = Vec::new();

    let result = Pipeline::new(&mut store, &credentials, &spotify)
        .run(&mut out)
        .await;

    assert!(matches!(result, Err(Error::NotFound { .. })));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
    assert!(store.backend().is_empty());
    assert!(out.is_empty());
}

#[tokio::test]
async fn test_run_with_expired_token_stops_before_persist_and_report() {
    let (app, _) = fake_spotify("fresh", envelope(vec![item("t1", "Song", &["a1"])]), "{}");
    let spotify = client(&spawn(app).await);
    let credentials = MemoryCredentialStore::new("Access Token: expired\n");
    let mut store = RecordStore::new(MemoryBackend::new(), 10);
    store.put("old", &track("old", "Old", "x")).await.unwrap();
    let mut out: Vec<u8> = Vec::new();

    let result = Pipeline::new(&mut store, &credentials, &spotify)
        .run(&mut out)
        .await;

    assert!(matches!(
        result,
        Err(Error::Http { status }) if status == StatusCode::UNAUTHORIZED
    ));
    assert_eq!(store.backend().len(), 1);
    assert!(out.is_empty());
}

#[tokio::test]
async fn test_run_with_malformed_response_is_fatal() {
    let spotify = client(&spawn(fixed_response(StatusCode::OK, "{\"items\": 5}")).await);
    let credentials = MemoryCredentialStore::new("Access Token: tok\n");
    let mut store = RecordStore::new(MemoryBackend::new(), 10);

    let result = Pipeline::new(&mut store, &credentials, &spotify)
        .run(&mut std::io::sink())
        .await;

    assert!(matches!(result, Err(Error::Decode(_))));
    assert!(store.backend().is_empty());
}

#[tokio::test]
async fn test_report_prints_valid_records_and_counts_anomalies() {
    let mut backend = MemoryBackend::new();
    backend.insert_raw("broken", "{\"id\": 1}");
    let mut store = RecordStore::new(backend, 1);
    store.put("t1", &track("t1", "Song", "a1")).await.unwrap();
    store.put("t2", &track("t2", "Other", "a2")).await.unwrap();
    let mut out: Vec<u8> = Vec::new();

    let report = pipeline::report(&mut store, &mut out).await.unwrap();

    assert_eq!(report.records.len(), 2);
    assert_eq!(report.anomalies.len(), 1);
    assert!(matches!(
        &report.anomalies[0],
        Error::Corrupt { key, .. } if key == "broken"
    ));
    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("Other"));
    assert!(!printed.contains("broken"));
}

#[tokio::test]
async fn test_report_on_empty_store() {
    let mut store = RecordStore::new(MemoryBackend::new(), 10);
    let mut out: Vec<u8> = Vec::new();

    let report = pipeline::report(&mut store, &mut out).await.unwrap();

    assert!(report.records.is_empty());
    assert_eq!(String::from_utf8(out).unwrap(), "No tracks stored.\n");
}
