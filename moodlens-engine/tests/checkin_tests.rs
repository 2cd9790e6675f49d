//! Check-in service tests
//!
//! End-to-end flow from request to persisted record, plus recovery when the
//! store rejects the append.

mod helpers;

use helpers::{journal_path, open_store, signal, FlakyStore};
use moodlens_common::config::TomlConfig;
use moodlens_common::{EmotionLabel, Modality};
use moodlens_engine::recommend::ActionHorizon;
use moodlens_engine::store::EventStore;
use moodlens_engine::triggers::TriggerExtractor;
use moodlens_engine::{
    CheckInContext, CheckInRequest, CheckInService, Error, JsonlEventStore, SummaryWindow,
};
use std::collections::BTreeSet;
use std::sync::Arc;

fn anxious_request() -> CheckInRequest {
    CheckInRequest::new(vec![
        signal(Modality::Questions, EmotionLabel::Anxious, 0.8),
        signal(Modality::Journaling, EmotionLabel::Anxious, 0.9),
    ])
    .with_context(
        CheckInContext::default()
            .with_answer("worry", "a_lot")
            .with_tag("Poor Sleep"),
    )
}

#[test]
fn test_check_in_round_trip_through_journal() {
    let (_dir, path) = journal_path();
    let store = Arc::new(open_store(&path));
    let service = CheckInService::from_config(store.clone(), &TomlConfig::default()).unwrap();

    let outcome = service.check_in(anxious_request()).unwrap();
    let expected: BTreeSet<String> = ["high_stress", "poor_sleep"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(outcome.record.result.triggers, expected);
    assert_eq!(store.len(), 1);

    // A fresh process sees the same record
    drop(service);
    let reopened = JsonlEventStore::open(&path).unwrap();
    let stored = reopened
        .query(outcome.record.result.timestamp, outcome.record.result.timestamp)
        .unwrap();
    assert_eq!(stored, vec![outcome.record]);
}

#[test]
fn test_failed_append_returns_record_for_retry() {
    let (_dir, path) = journal_path();
    let store = Arc::new(FlakyStore::new(open_store(&path)));
    let service = CheckInService::from_config(store.clone(), &TomlConfig::default()).unwrap();

    let err = service.check_in(anxious_request()).unwrap_err();
    let record = match err {
        Error::Unpersisted { record, source } => {
            assert!(matches!(*source, Error::StoreUnavailable { .. }));
            *record
        }
        other => panic!("expected Unpersisted, got {:?}", other),
    };
    assert_eq!(record.result.dominant_label, EmotionLabel::Anxious);
    assert!(!record.recommendations.is_empty());

    // Still failing: the same record comes back again
    let again = service.retry_append(record.clone()).unwrap_err();
    assert!(matches!(again, Error::Unpersisted { .. }));

    store.set_failing(false);
    let outcome = service.retry_append(record.clone()).unwrap();
    assert_eq!(outcome.record, record);

    let summary = service.summarize(SummaryWindow::Week).unwrap();
    assert_eq!(summary.total_records, 1);
}

#[test]
fn test_recommendation_limit_from_config() {
    let (_dir, path) = journal_path();
    let mut config = TomlConfig::default();
    config.recommendations.max_recommendations = 2;

    let service = CheckInService::from_config(Arc::new(open_store(&path)), &config).unwrap();
    let outcome = service.check_in(anxious_request()).unwrap();

    assert_eq!(
        outcome.record.recommendations,
        vec!["three-deep-breaths", "grounding-54321"]
    );
    assert_eq!(outcome.actions[0].title, "3 Deep Breaths");
}

#[test]
fn test_custom_catalog_from_config() {
    let (dir, path) = journal_path();
    let catalog_path = dir.path().join("catalog.toml");
    std::fs::write(
        &catalog_path,
        r#"
        [[actions]]
        id = "sleep-routine"
        title = "Plan a wind-down routine"
        kind = "rest"
        duration = "15 min"
        horizon = "short_term"
        triggers = ["poor_sleep"]
        "#,
    )
    .unwrap();

    let mut config = TomlConfig::default();
    config.recommendations.catalog_path = Some(catalog_path);

    let service = CheckInService::from_config(Arc::new(open_store(&path)), &config).unwrap();
    let outcome = service.check_in(anxious_request()).unwrap();
    assert_eq!(outcome.record.recommendations, vec!["sleep-routine"]);
    assert_eq!(outcome.actions[0].horizon, ActionHorizon::ShortTerm);
}

#[test]
fn test_missing_catalog_file_is_config_error() {
    let (dir, path) = journal_path();
    let mut config = TomlConfig::default();
    config.recommendations.catalog_path = Some(dir.path().join("missing.toml"));

    let result = CheckInService::from_config(Arc::new(open_store(&path)), &config);
    assert!(matches!(result, Err(Error::Config(_))));
}

struct FixedTags;

impl TriggerExtractor for FixedTags {
    fn extract(&self, _context: &CheckInContext) -> BTreeSet<String> {
        ["burnout".to_string()].into_iter().collect()
    }
}

#[test]
fn test_custom_extractor_is_used() {
    let (_dir, path) = journal_path();
    let service = CheckInService::from_config(Arc::new(open_store(&path)), &TomlConfig::default())
        .unwrap()
        .with_extractor(Arc::new(FixedTags));

    let outcome = service.check_in(anxious_request()).unwrap();
    assert_eq!(
        outcome.record.result.triggers.iter().collect::<Vec<_>>(),
        vec!["burnout"]
    );
}
