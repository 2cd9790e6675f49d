// Fusion Module - Weighted Multi-Modality Emotion Fusion
//
// Pipeline: validate signals → renormalize weights over present modalities →
// accumulate per-label scores → pick the dominant label (priority tie-break) →
// assess quality.

pub mod engine;
pub mod quality;
pub mod weights;

use chrono::{DateTime, Utc};
use moodlens_common::{EmotionLabel, Modality};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub use engine::FusionEngine;
pub use quality::FusionQuality;

/// Confidence score (0.0-1.0)
pub type Confidence = f64;

/// Per-modality weight-adjusted share (renormalized weight × confidence)
pub type Contributions = BTreeMap<Modality, f64>;

/// Output of one fusion call
///
/// Immutable once created; the event store owns it after append.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusionResult {
    pub timestamp: DateTime<Utc>,

    /// Label with the highest accumulated score
    pub dominant_label: EmotionLabel,

    /// Winning accumulated score, clamped to [0.0, 1.0]
    pub confidence: Confidence,

    /// Every present modality's contribution, whichever label it voted for
    pub contributions: Contributions,

    /// Trigger tags derived from the check-in context
    #[serde(default)]
    pub triggers: BTreeSet<String>,

    /// Accumulated score of every label that received a vote
    #[serde(default)]
    pub label_scores: BTreeMap<EmotionLabel, f64>,

    pub quality: FusionQuality,
}

impl FusionResult {
    /// Modalities that took part in this fusion
    pub fn modalities_used(&self) -> Vec<Modality> {
        self.contributions.keys().copied().collect()
    }

    /// True if the result carries the given trigger tag
    pub fn has_trigger(&self, tag: &str) -> bool {
        self.triggers.contains(tag)
    }

    /// Confidence and contributions are finite and in range
    pub fn is_well_formed(&self) -> bool {
        let in_unit = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        in_unit(self.confidence) && self.contributions.values().all(|v| in_unit(*v))
    }
}
