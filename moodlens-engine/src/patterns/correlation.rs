// Trigger Correlation - Co-occurrence of trigger tags and dominant labels
//
// co_occurrence(t, e) = |records tagged t with label e| / |records tagged t| × 100
// Tags seen in fewer than `min_support` records are not reported.

use moodlens_common::EmotionLabel;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::record::EventRecord;

/// One (trigger, emotion) pair and how often they co-occur
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerCorrelation {
    pub trigger: String,
    pub emotion: EmotionLabel,

    /// Percentage of `trigger` records whose dominant label was `emotion`
    pub co_occurrence_percentage: f64,

    /// Records in the window carrying `trigger`
    pub support: usize,

    /// Records carrying `trigger` with dominant label `emotion`
    pub occurrences: usize,
}

/// Correlate every sufficiently supported trigger with the labels it co-occurs with
///
/// # Arguments
/// * `records` - Records of the current window
/// * `min_support` - Minimum number of records a tag must appear in
///
/// # Returns
/// Correlations sorted by percentage (desc), then support (desc), trigger, emotion
pub fn correlate(records: &[&EventRecord], min_support: usize) -> Vec<TriggerCorrelation> {
    let mut by_trigger: BTreeMap<&str, (usize, BTreeMap<EmotionLabel, usize>)> = BTreeMap::new();

    for record in records {
        for trigger in &record.result.triggers {
            let (support, emotions) = by_trigger.entry(trigger.as_str()).or_default();
            *support += 1;
            *emotions.entry(record.result.dominant_label).or_insert(0) += 1;
        }
    }

    let mut correlations: Vec<TriggerCorrelation> = by_trigger
        .into_iter()
        .filter(|(_, (support, _))| *support >= min_support.max(1))
        .flat_map(|(trigger, (support, emotions))| {
            emotions
                .into_iter()
                .map(move |(emotion, occurrences)| TriggerCorrelation {
                    trigger: trigger.to_string(),
                    emotion,
                    co_occurrence_percentage: occurrences as f64 * 100.0 / support as f64,
                    support,
                    occurrences,
                })
        })
        .collect();

    correlations.sort_by(compare_correlations);
    correlations
}

fn compare_correlations(a: &TriggerCorrelation, b: &TriggerCorrelation) -> Ordering {
    b.co_occurrence_percentage
        .total_cmp(&a.co_occurrence_percentage)
        .then_with(|| b.support.cmp(&a.support))
        .then_with(|| a.trigger.cmp(&b.trigger))
        .then_with(|| a.emotion.cmp(&b.emotion))
}

/// Strongest emotion per trigger (first entry per trigger in sorted order)
pub fn strongest_per_trigger(correlations: &[TriggerCorrelation]) -> Vec<&TriggerCorrelation> {
    let mut seen = std::collections::BTreeSet::new();
    correlations
        .iter()
        .filter(|c| seen.insert(c.trigger.as_str()))
        .collect()
}
