//! QA tests for saving the closing memory.
//!
//! These tests verify:
//! - Save is only offered on the closing section
//! - The saved record carries answers, quote, and a timestamp
//! - A failing store surfaces a failure notification
//! - Records written to disk read back intact

mod common;

use chrono::Utc;
use journey_core::content::{CLOSING_QUOTE, MEMORY_KEY, QUESTIONS};
use journey_core::persist::{load_memory, InMemoryStore};
use journey_core::sinks::NotificationLevel;
use journey_core::testing::{FailingStore, TestHarness};
use journey_core::{JourneyConfig, JourneyError, JsonFileStore, KeyValueStore, PersistError, Section};
use std::sync::Arc;
use tempfile::TempDir;

fn answer_all(harness: &mut TestHarness) {
    harness.journey.go_to(1);
    harness.journey.submit_answer("Wisuda");
    harness.journey.submit_answer("Ketekunannya");
    harness.journey.submit_answer("Rumah kecil di pantai");
}

#[tokio::test]
async fn test_save_requires_closing_section() {
    common::init_tracing();
    let mut harness = TestHarness::new();
    harness.journey.start();

    let err = harness.journey.save_memory().await.unwrap_err();
    match err {
        JourneyError::SectionUnavailable { expected, current } => {
            assert_eq!(expected, Section::Closing);
            assert_eq!(current, Some(Section::MemoryGame));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(harness.notifier.notifications().is_empty());
    assert!(harness.store.get(MEMORY_KEY).await.unwrap().is_none());
}

#[tokio::test]
async fn test_save_stores_answers_and_quote() {
    let mut harness = TestHarness::new();
    harness.journey.start();
    answer_all(&mut harness);
    harness.journey.go_to(5);

    let before = Utc::now();
    let record = harness.journey.save_memory().await.unwrap();
    assert!(record.date >= before);
    assert_eq!(record.quote, CLOSING_QUOTE);
    assert_eq!(record.answers.len(), 3);
    assert_eq!(record.answers.get(&QUESTIONS[2].text), Some("Rumah kecil di pantai"));

    let stored = load_memory(harness.store.as_ref(), MEMORY_KEY).await.unwrap();
    assert_eq!(stored, record);

    let notes = harness.notifier.notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, NotificationLevel::Success);
    assert_eq!(notes[0].title, "Kenangan tersimpan! 💕");
}

#[tokio::test]
async fn test_save_with_no_answers() {
    let mut harness = TestHarness::new();
    harness.journey.start();
    harness.journey.go_to(5);

    let record = harness.journey.save_memory().await.unwrap();
    assert!(record.answers.is_empty());

    let raw = harness.store.get(MEMORY_KEY).await.unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(json["date"].is_string());
    assert_eq!(json["answers"], serde_json::json!({}));
    assert_eq!(json["quote"], CLOSING_QUOTE);
}

#[tokio::test]
async fn test_second_save_overwrites_first() {
    let mut harness = TestHarness::new();
    harness.journey.start();
    harness.journey.go_to(5);
    harness.journey.save_memory().await.unwrap();

    answer_all(&mut harness);
    harness.journey.go_to(5);
    harness.journey.save_memory().await.unwrap();

    let stored = load_memory(harness.store.as_ref(), MEMORY_KEY).await.unwrap();
    assert_eq!(stored.answers.len(), 3);
    assert_eq!(harness.notifier.notifications().len(), 2);
}

#[tokio::test]
async fn test_failing_store_notifies_failure() {
    let mut harness = TestHarness::with_store(
        JourneyConfig::default().with_seed(7),
        Arc::new(FailingStore),
    );
    harness.journey.start();
    answer_all(&mut harness);
    harness.journey.go_to(5);

    let err = harness.journey.save_memory().await.unwrap_err();
    assert!(matches!(
        err,
        JourneyError::Persist(PersistError::Unavailable(_))
    ));
    assert_eq!(harness.journey.answers().len(), 3);

    let notes = harness.notifier.notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, NotificationLevel::Failure);
}

#[tokio::test]
async fn test_json_file_store_round_trip() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(JsonFileStore::new(dir.path().join("memories")));
    let config = JourneyConfig::default()
        .with_seed(7)
        .with_memory_key("kenangan/ulang tahun");
    let mut harness = TestHarness::with_store(config, store.clone());
    harness.journey.start();
    answer_all(&mut harness);
    harness.journey.go_to(5);

    let record = harness.journey.save_memory().await.unwrap();

    let path = store.path_for("kenangan/ulang tahun");
    assert!(path.exists());
    assert_eq!(path.file_name().unwrap(), "kenangan_ulang_tahun.json");

    let loaded = load_memory(store.as_ref(), "kenangan/ulang tahun").await.unwrap();
    assert_eq!(loaded, record);

    // The in-memory store was bypassed.
    assert!(harness.store.get("kenangan/ulang tahun").await.unwrap().is_none());
}

#[tokio::test]
async fn test_load_missing_key_is_not_found() {
    let store = InMemoryStore::new();
    assert!(matches!(
        load_memory(&store, MEMORY_KEY).await,
        Err(PersistError::NotFound(key)) if key == MEMORY_KEY
    ));

    let dir = TempDir::new().unwrap();
    let files = JsonFileStore::new(dir.path());
    assert!(matches!(
        load_memory(&files, MEMORY_KEY).await,
        Err(PersistError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_corrupt_file_is_a_json_error() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path());
    store.set(MEMORY_KEY, "{not json".to_string()).await.unwrap();

    assert!(matches!(
        load_memory(&store, MEMORY_KEY).await,
        Err(PersistError::Json(_))
    ));
}
