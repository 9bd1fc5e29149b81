//! Tests for bulk catalogue download and parsing.

use std::io::Write;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{download_bulk_from, load_bulk, load_bulk_from, read_bulk_file, BulkEntry};
use crate::error::CollectionError;

/// Helper: a catalogue entry as Scryfall serves it, including fields we ignore.
fn bulk_entry_json(name: &str, set: &str, set_name: &str, set_type: &str) -> serde_json::Value {
    serde_json::json!({
        "object": "card",
        "id": "0000579f-7b35-4ed3-b44c-db2a538066fe",
        "oracle_id": "44623693-51d6-49ad-8cd7-140505caf02f",
        "name": name,
        "lang": "en",
        "released_at": "1996-10-08",
        "set": set,
        "set_name": set_name,
        "set_type": set_type,
        "games": ["paper", "mtgo"],
        "collector_number": "123",
        "rarity": "rare",
        "prices": { "usd": "1.23", "eur": "0.99" }
    })
}

fn small_catalogue() -> serde_json::Value {
    serde_json::json!([
        bulk_entry_json("Hammer of Bogardan", "mir", "Mirage", "expansion"),
        bulk_entry_json("Fireball", "lea", "Limited Edition Alpha", "core"),
    ])
}

// ── download_bulk_from ───────────────────────────────────────────────

#[tokio::test]
async fn download_writes_response_body_to_file() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/default-cards.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(small_catalogue()))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("default_cards.json");
    let url = format!("{}/default-cards.json", mock_server.uri());

    let target_clone = target.clone();
    let result = tokio::task::spawn_blocking(move || download_bulk_from(&url, &target_clone))
        .await
        .unwrap();

    let written = result.unwrap();
    assert!(written > 0);
    assert!(target.exists());

    let entries = read_bulk_file(&target).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].name, "Hammer of Bogardan");
    assert_eq!(entries[0].set_code, "mir");
}

#[tokio::test]
async fn download_creates_missing_parent_directories() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/default-cards.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(small_catalogue()))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("nested").join("cache").join("cards.json");
    let url = format!("{}/default-cards.json", mock_server.uri());

    let target_clone = target.clone();
    let result = tokio::task::spawn_blocking(move || download_bulk_from(&url, &target_clone))
        .await
        .unwrap();

    assert!(result.is_ok());
    assert!(target.exists());
}

#[tokio::test]
async fn download_404_returns_http_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/default-cards.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("cards.json");
    let url = format!("{}/default-cards.json", mock_server.uri());

    let result = tokio::task::spawn_blocking(move || download_bulk_from(&url, &target))
        .await
        .unwrap();

    match result {
        Err(CollectionError::HttpStatus(status)) => {
            assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
        }
        other => panic!("Expected CollectionError::HttpStatus(404), got: {other:?}"),
    }
}

// ── read_bulk_file ───────────────────────────────────────────────────

#[test]
fn read_skips_fields_the_oracle_does_not_need() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", small_catalogue()).unwrap();

    let entries = read_bulk_file(file.path()).unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].name, "Fireball");
    assert_eq!(entries[1].set_code, "lea");
    assert_eq!(entries[1].set_name, "Limited Edition Alpha");
    assert_eq!(entries[1].set_type, "core");
    assert_eq!(entries[1].games, vec!["paper", "mtgo"]);
}

#[test]
fn read_defaults_games_when_absent() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[{{"name": "Fireball", "lang": "en", "set": "lea", "set_name": "Alpha", "set_type": "core"}}]"#
    )
    .unwrap();

    let entries = read_bulk_file(file.path()).unwrap();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].games.is_empty());
    assert!(!entries[0].is_mtgo_only());
}

#[test]
fn read_corrupt_json_returns_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "[{{\"name\": \"Fireball\"").unwrap();

    match read_bulk_file(file.path()) {
        Err(CollectionError::Parse(_)) => {}
        other => panic!("Expected CollectionError::Parse, got: {other:?}"),
    }
}

#[test]
fn read_missing_file_returns_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.json");

    match read_bulk_file(&missing) {
        Err(CollectionError::Io(_)) => {}
        other => panic!("Expected CollectionError::Io, got: {other:?}"),
    }
}

// ── load_bulk ────────────────────────────────────────────────────────

#[test]
fn load_reads_existing_file_without_downloading() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", small_catalogue()).unwrap();

    // No mock server running; any network attempt would fail
    let entries = load_bulk(file.path()).unwrap();
    assert_eq!(entries.len(), 2);
}

#[tokio::test]
async fn load_downloads_when_file_is_missing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/default-cards.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(small_catalogue()))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("cards.json");
    let url = format!("{}/default-cards.json", mock_server.uri());

    let target_clone = target.clone();
    let url_clone = url.clone();
    let entries = tokio::task::spawn_blocking(move || load_bulk_from(&url_clone, &target_clone))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(entries.len(), 2);
    assert!(target.exists());

    // A second load finds the file and does not touch the network again
    mock_server.reset().await;
    let target_clone = target.clone();
    let entries = tokio::task::spawn_blocking(move || load_bulk_from(&url, &target_clone))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(entries.len(), 2);
}

// ── BulkEntry ────────────────────────────────────────────────────────

#[test]
fn mtgo_only_detection() {
    let entry = |games: Vec<&str>| BulkEntry {
        name: "Test".to_string(),
        lang: "en".to_string(),
        set_code: "tst".to_string(),
        set_name: "Test Set".to_string(),
        set_type: "expansion".to_string(),
        games: games.into_iter().map(String::from).collect(),
    };

    assert!(entry(vec!["mtgo"]).is_mtgo_only());
    assert!(!entry(vec!["paper", "mtgo"]).is_mtgo_only());
    assert!(!entry(vec!["paper"]).is_mtgo_only());
    assert!(!entry(vec![]).is_mtgo_only());
}
