//! JSONL event store durability and ordering tests
//!
//! Tests the journal contract:
//! - Append-then-query round-trips results bit-identically (also across reopen)
//! - Torn trailing writes and malformed lines never hide earlier history
//! - A repeated record id keeps its first copy
//! - Concurrent appends never interleave bytes

mod helpers;

use chrono::Duration;
use helpers::{capture_logs, journal_path, open_store, record_at, reference_now, signal};
use moodlens_common::{EmotionLabel, Modality};
use moodlens_engine::store::EventStore;
use moodlens_engine::{CheckInContext, EventRecord, FusionEngine, JsonlEventStore};
use std::io::Write;
use std::sync::Arc;
use std::thread;

fn awkward_record() -> EventRecord {
    // Confidences whose decimal forms are not short
    let result = FusionEngine::default()
        .fuse_at(
            &[
                signal(Modality::Questions, EmotionLabel::Overwhelmed, 0.1 + 0.2),
                signal(Modality::Journaling, EmotionLabel::Overwhelmed, 1.0 / 3.0),
                signal(Modality::Voice, EmotionLabel::Tired, 0.7),
            ],
            helpers::tag_set(&["work_pressure", "mental_overload"]),
            reference_now(),
        )
        .unwrap();
    EventRecord::new(
        result,
        vec!["brain-dump".to_string()],
        CheckInContext::default().with_answer("thoughts", "racing"),
    )
}

#[test]
fn test_round_trip_is_bit_identical() {
    let (_dir, path) = journal_path();
    let original = awkward_record();

    {
        let store = open_store(&path);
        store.append(original.clone()).unwrap();

        let queried = store.query(reference_now(), reference_now()).unwrap();
        assert_eq!(queried, vec![original.clone()]);
    }

    let reopened = open_store(&path);
    let queried = reopened
        .query(reference_now() - Duration::days(1), reference_now())
        .unwrap();
    assert_eq!(queried.len(), 1);

    let result = &queried[0].result;
    assert_eq!(result.dominant_label, original.result.dominant_label);
    assert_eq!(
        result.confidence.to_bits(),
        original.result.confidence.to_bits()
    );
    assert_eq!(result.triggers, original.result.triggers);
    for (modality, value) in &original.result.contributions {
        assert_eq!(result.contributions[modality].to_bits(), value.to_bits());
    }
    assert_eq!(queried[0], original);
}

#[test]
fn test_journal_line_format() {
    let (_dir, path) = journal_path();
    let store = open_store(&path);
    store
        .append(record_at(EmotionLabel::Calm, reference_now(), &[]))
        .unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.ends_with('\n'));
    let line: serde_json::Value = serde_json::from_str(content.trim_end()).unwrap();
    assert_eq!(line["schema_version"], 1);
    assert_eq!(line["record"]["result"]["dominant_label"], "calm");
}

#[test]
fn test_torn_tail_is_skipped_and_terminated() {
    let (_dir, path) = journal_path();
    let first = record_at(EmotionLabel::Sad, reference_now() - Duration::hours(2), &[]);
    {
        let store = open_store(&path);
        store.append(first.clone()).unwrap();
    }

    // Simulate a crash halfway through the next line
    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .open(&path)
        .unwrap();
    file.write_all(br#"{"schema_version":1,"record":{"id":"#).unwrap();
    drop(file);

    let (logs, _guard) = capture_logs();
    let store = open_store(&path);
    assert_eq!(store.len(), 1);
    assert_eq!(store.skipped_on_open(), 1);
    logs.assert_warned("Skipping malformed journal line 2");

    let second = record_at(EmotionLabel::Happy, reference_now(), &[]);
    store.append(second.clone()).unwrap();
    drop(store);

    let reopened = open_store(&path);
    let all = reopened
        .query(reference_now() - Duration::days(1), reference_now())
        .unwrap();
    assert_eq!(all, vec![first, second]);
    assert_eq!(reopened.skipped_on_open(), 1);
}

#[test]
fn test_unsupported_schema_version_skipped() {
    let (_dir, path) = journal_path();
    let record = record_at(EmotionLabel::Neutral, reference_now(), &[]);
    let line = serde_json::json!({"schema_version": 99, "record": record});
    std::fs::write(&path, format!("{}\n\n", line)).unwrap();

    let (logs, _guard) = capture_logs();
    let store = open_store(&path);
    assert!(store.is_empty());
    logs.assert_warned("unsupported schema_version=99");
}

#[test]
fn test_out_of_order_history_is_sorted_on_open() {
    let (_dir, path) = journal_path();
    let late = record_at(EmotionLabel::Calm, reference_now(), &[]);
    let early = record_at(EmotionLabel::Sad, reference_now() - Duration::hours(3), &[]);
    {
        let store = open_store(&path);
        store.append(late.clone()).unwrap();
        store.append(early.clone()).unwrap();
    }

    let store = open_store(&path);
    let all = store
        .query(reference_now() - Duration::days(1), reference_now())
        .unwrap();
    assert_eq!(all, vec![early, late]);
}

#[test]
fn test_repeated_record_id_keeps_first_copy() {
    let (_dir, path) = journal_path();
    let first = record_at(EmotionLabel::Tired, reference_now() - Duration::hours(1), &[]);
    let other = record_at(EmotionLabel::Calm, reference_now(), &[]);
    let mut retried = first.clone();
    retried.recommendations = vec!["from the retry".to_string()];

    let lines: Vec<String> = [&first, &other, &retried]
        .iter()
        .map(|r| serde_json::json!({"schema_version": 1, "record": r}).to_string())
        .collect();
    std::fs::write(&path, lines.join("\n") + "\n").unwrap();

    let (logs, _guard) = capture_logs();
    let store = open_store(&path);
    assert_eq!(store.len(), 2);
    assert_eq!(store.skipped_on_open(), 1);
    logs.assert_warned(&format!("Skipping duplicate record {} at journal line 3", first.id));

    let all = store
        .query(reference_now() - Duration::days(1), reference_now())
        .unwrap();
    assert_eq!(all, vec![first.clone(), other]);

    // Appending a stored id again leaves the journal untouched
    let before = std::fs::read(&path).unwrap();
    assert_eq!(store.append(retried).unwrap(), first.id);
    assert_eq!(store.len(), 2);
    assert_eq!(std::fs::read(&path).unwrap(), before);
}

#[test]
fn test_open_fails_for_directory_path() {
    let (dir, _) = journal_path();
    let err = JsonlEventStore::open(dir.path()).unwrap_err();
    assert!(matches!(
        err,
        moodlens_engine::Error::StoreUnavailable { .. }
    ));
}

#[test]
fn test_concurrent_appends_do_not_interleave() {
    let (_dir, path) = journal_path();
    let store = Arc::new(open_store(&path));

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..25 {
                    let at = reference_now() - Duration::minutes(worker * 100 + i);
                    store
                        .append(record_at(EmotionLabel::Anxious, at, &["high_stress"]))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.len(), 200);

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 200);
    for line in content.lines() {
        serde_json::from_str::<serde_json::Value>(line).unwrap();
    }

    let reopened = open_store(&path);
    let all = reopened
        .query(reference_now() - Duration::days(1), reference_now())
        .unwrap();
    assert_eq!(all.len(), 200);
    assert!(all
        .windows(2)
        .all(|w| w[0].result.timestamp <= w[1].result.timestamp));
}
