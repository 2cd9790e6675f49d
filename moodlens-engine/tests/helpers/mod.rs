//! Test Helper Utilities
//!
//! Shared fixtures for moodlens-engine integration tests
#![allow(dead_code)]

pub mod log_capture;
pub mod stores;

use chrono::{DateTime, TimeZone, Utc};
use moodlens_common::{EmotionLabel, Modality, ModalitySignal};
use moodlens_engine::{CheckInContext, EventRecord, FusionEngine, JsonlEventStore};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub use log_capture::{capture_logs, LogCapture};
pub use stores::{CountingStore, FlakyStore};

/// Fixed reference instant for window arithmetic
pub fn reference_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 1, 20, 0, 0).unwrap()
}

pub fn signal(modality: Modality, label: EmotionLabel, confidence: f64) -> ModalitySignal {
    ModalitySignal::new(modality, label, confidence)
}

pub fn tag_set(tags: &[&str]) -> BTreeSet<String> {
    tags.iter().map(|t| t.to_string()).collect()
}

/// Single-modality record with the given triggers
pub fn record_at(label: EmotionLabel, at: DateTime<Utc>, tags: &[&str]) -> EventRecord {
    let result = FusionEngine::default()
        .fuse_at(
            &[signal(Modality::Journaling, label, 0.75)],
            tag_set(tags),
            at,
        )
        .unwrap();
    EventRecord::new(result, vec![], CheckInContext::default())
}

/// Temp dir plus a journal path inside it
pub fn journal_path() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("events.jsonl");
    (dir, path)
}

pub fn open_store(path: &Path) -> JsonlEventStore {
    JsonlEventStore::open(path).unwrap()
}
