// Recommendation Selector - Deterministic action choice
//
// 1. Entries relevant to the dominant label, in catalog order
// 2. Entries relevant to any trigger tag, in catalog order
// De-duplicated, capped at max_recommendations.

use moodlens_common::EmotionLabel;
use std::collections::BTreeSet;
use tracing::debug;

use super::catalog::ActionCatalog;

/// Pick action ids for a fused check-in
///
/// # Arguments
/// * `dominant_label` - Fused dominant emotion
/// * `triggers` - Trigger tags of the check-in
/// * `catalog` - Candidate actions
/// * `max_recommendations` - Upper bound on returned ids
pub fn select(
    dominant_label: EmotionLabel,
    triggers: &BTreeSet<String>,
    catalog: &ActionCatalog,
    max_recommendations: usize,
) -> Vec<String> {
    let by_emotion = catalog
        .entries()
        .iter()
        .filter(|e| e.matches_emotion(dominant_label));
    let by_trigger = catalog
        .entries()
        .iter()
        .filter(|e| e.matches_any_trigger(triggers));

    let mut seen = BTreeSet::new();
    let selected: Vec<String> = by_emotion
        .chain(by_trigger)
        .filter(|e| seen.insert(e.id.as_str()))
        .take(max_recommendations)
        .map(|e| e.id.clone())
        .collect();

    debug!(
        "Selected {} recommendations for {} ({} triggers)",
        selected.len(),
        dominant_label,
        triggers.len()
    );

    selected
}

/// Catalog plus selection limit
#[derive(Debug, Clone)]
pub struct RecommendationSelector {
    catalog: ActionCatalog,
    max_recommendations: usize,
}

impl Default for RecommendationSelector {
    fn default() -> Self {
        Self::new(ActionCatalog::default(), 5)
    }
}

impl RecommendationSelector {
    pub fn new(catalog: ActionCatalog, max_recommendations: usize) -> Self {
        Self {
            catalog,
            max_recommendations,
        }
    }

    pub fn catalog(&self) -> &ActionCatalog {
        &self.catalog
    }

    pub fn max_recommendations(&self) -> usize {
        self.max_recommendations
    }

    pub fn select(&self, dominant_label: EmotionLabel, triggers: &BTreeSet<String>) -> Vec<String> {
        select(dominant_label, triggers, &self.catalog, self.max_recommendations)
    }
}
