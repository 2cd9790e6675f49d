// Fusion Engine - Renormalized Weighted Voting
//
// score(label) = Σ w'_m × confidence_m over modalities m voting for label
// dominant     = argmax score, exact ties broken by journaling > questions > face > voice
// confidence   = clamp(score(dominant), 0, 1)

use chrono::{DateTime, Utc};
use moodlens_common::config::ModalityWeights;
use moodlens_common::{time, EmotionLabel, ModalitySignal};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use super::quality::assess_quality;
use super::weights::renormalize;
use super::{Contributions, FusionResult};
use crate::error::{Error, Result};

/// Combines modality signals into one emotion decision
///
/// Holds an immutable weight table; safe to share across threads.
#[derive(Debug, Clone)]
pub struct FusionEngine {
    weights: ModalityWeights,
}

impl Default for FusionEngine {
    fn default() -> Self {
        Self {
            weights: ModalityWeights::default(),
        }
    }
}

impl FusionEngine {
    /// Create an engine from a validated weight table
    pub fn new(weights: ModalityWeights) -> Result<Self> {
        weights.validate()?;
        Ok(Self { weights })
    }

    pub fn weights(&self) -> &ModalityWeights {
        &self.weights
    }

    /// Fuse signals, timestamped now, without trigger tags
    pub fn fuse(&self, signals: &[ModalitySignal]) -> Result<FusionResult> {
        self.fuse_at(signals, BTreeSet::new(), time::now())
    }

    /// Fuse signals with explicit triggers and timestamp
    ///
    /// # Errors
    /// * `InsufficientSignal` - no signals supplied
    /// * `InvalidConfidence` - a confidence is outside [0.0, 1.0]
    /// * `DuplicateModality` - a modality appears more than once
    pub fn fuse_at(
        &self,
        signals: &[ModalitySignal],
        triggers: BTreeSet<String>,
        timestamp: DateTime<Utc>,
    ) -> Result<FusionResult> {
        validate_signals(signals)?;

        // Fixed summation order keeps exact ties reproducible regardless of input order
        let mut ordered: Vec<&ModalitySignal> = signals.iter().collect();
        ordered.sort_by_key(|s| s.modality.priority_rank());

        let present: Vec<_> = ordered.iter().map(|s| s.modality).collect();
        let weights = renormalize(&self.weights, &present);

        let mut contributions = Contributions::new();
        let mut label_scores: BTreeMap<EmotionLabel, f64> = BTreeMap::new();

        for signal in &ordered {
            let weight = weights.get(&signal.modality).copied().unwrap_or(0.0);
            let share = weight * signal.confidence;
            contributions.insert(signal.modality, share);
            *label_scores.entry(signal.label).or_insert(0.0) += share;
        }

        let best = label_scores
            .values()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);

        // Highest-priority modality voting for a top-scoring label decides
        let dominant_label = ordered
            .iter()
            .find(|s| label_scores.get(&s.label).copied() == Some(best))
            .map(|s| s.label)
            .ok_or(Error::InsufficientSignal)?;

        let confidence = best.clamp(0.0, 1.0);
        let agreeing = ordered.iter().filter(|s| s.label == dominant_label).count();
        let quality = assess_quality(ordered.len(), agreeing, confidence);

        debug!(
            "Fused {} signals: {} ({:.3}, quality={})",
            ordered.len(),
            dominant_label,
            confidence,
            quality
        );

        Ok(FusionResult {
            timestamp,
            dominant_label,
            confidence,
            contributions,
            triggers,
            label_scores,
            quality,
        })
    }
}

/// Reject empty, out-of-range or duplicate signal sets before fusion
pub fn validate_signals(signals: &[ModalitySignal]) -> Result<()> {
    if signals.is_empty() {
        return Err(Error::InsufficientSignal);
    }

    let mut seen = BTreeSet::new();
    for signal in signals {
        if !signal.has_valid_confidence() {
            return Err(Error::InvalidConfidence {
                modality: signal.modality,
                value: signal.confidence,
            });
        }
        if !seen.insert(signal.modality) {
            return Err(Error::DuplicateModality(signal.modality));
        }
    }

    Ok(())
}
