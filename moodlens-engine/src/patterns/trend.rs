// Trend - Per-label share change between the prior and current window
//
// delta = current% - prior% (percentage points). A label with no record in the
// prior window has no baseline and reports InsufficientData.

use moodlens_common::EmotionLabel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::record::EventRecord;

/// Change of one label's share of records between two windows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrendDelta {
    Change {
        delta_percentage: f64,
        current_percentage: f64,
        prior_percentage: f64,
    },
    InsufficientData,
}

impl TrendDelta {
    pub fn delta(&self) -> Option<f64> {
        match self {
            TrendDelta::Change {
                delta_percentage, ..
            } => Some(*delta_percentage),
            TrendDelta::InsufficientData => None,
        }
    }

    pub fn is_insufficient(&self) -> bool {
        matches!(self, TrendDelta::InsufficientData)
    }
}

/// Trend for every label
pub fn compute_trend(
    current: &[&EventRecord],
    prior: &[&EventRecord],
) -> BTreeMap<EmotionLabel, TrendDelta> {
    let current_counts = count_labels(current);
    let prior_counts = count_labels(prior);

    EmotionLabel::ALL
        .iter()
        .map(|label| {
            let prior_count = prior_counts.get(label).copied().unwrap_or(0);
            let delta = if prior_count == 0 {
                TrendDelta::InsufficientData
            } else {
                let current_percentage =
                    percentage(current_counts.get(label).copied().unwrap_or(0), current.len());
                let prior_percentage = percentage(prior_count, prior.len());
                TrendDelta::Change {
                    delta_percentage: current_percentage - prior_percentage,
                    current_percentage,
                    prior_percentage,
                }
            };
            (*label, delta)
        })
        .collect()
}

pub(crate) fn count_labels(records: &[&EventRecord]) -> BTreeMap<EmotionLabel, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.result.dominant_label).or_insert(0) += 1;
    }
    counts
}

pub(crate) fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 * 100.0 / total as f64
    }
}
