//! Pattern/Trigger engine
//!
//! Summarizes the event history over a fixed window: label frequencies,
//! trigger-emotion co-occurrence, per-label trend against the preceding window
//! of equal length, short insights and pattern-level guidance.
//!
//! Each summary issues exactly one store query spanning both windows and then
//! splits the returned records by timestamp, so the work is proportional to the
//! records inside the two windows rather than to the full history.

pub mod correlation;
pub mod guidance;
pub mod insights;
pub mod trend;
pub mod window;

use chrono::{DateTime, Utc};
use moodlens_common::config::PatternSettings;
use moodlens_common::{time, EmotionLabel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::Result;
use crate::record::EventRecord;
use crate::store::EventStore;

pub use correlation::TriggerCorrelation;
pub use insights::{Insight, InsightKind, InsightPriority};
pub use trend::TrendDelta;
pub use window::{SummaryWindow, WindowBounds};

/// How often a label was dominant within the current window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionFrequency {
    pub count: usize,
    pub percentage: f64,
}

/// Pattern summary over one window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternSummary {
    pub window: SummaryWindow,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,

    /// Valid records in the current window
    pub total_records: usize,

    /// Records in either window skipped as malformed
    pub skipped_records: usize,

    /// Only labels that occurred in the current window
    pub emotion_frequency: BTreeMap<EmotionLabel, EmotionFrequency>,

    pub trigger_correlations: Vec<TriggerCorrelation>,

    /// Every label, compared against the prior window
    pub trend: BTreeMap<EmotionLabel, TrendDelta>,

    pub insights: Vec<Insight>,

    /// Pattern-level suggestions (at most three)
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl PatternSummary {
    /// Label with the most records in the current window
    pub fn most_common_emotion(&self) -> Option<EmotionLabel> {
        self.emotion_frequency
            .iter()
            .fold(None, |best: Option<(EmotionLabel, usize)>, (label, freq)| match best {
                Some((_, count)) if count >= freq.count => best,
                _ => Some((*label, freq.count)),
            })
            .map(|(label, _)| label)
    }

    /// Correlation for a specific (trigger, emotion) pair
    pub fn correlation(&self, trigger: &str, emotion: EmotionLabel) -> Option<&TriggerCorrelation> {
        self.trigger_correlations
            .iter()
            .find(|c| c.trigger == trigger && c.emotion == emotion)
    }
}

/// Computes pattern summaries from the event store
#[derive(Clone)]
pub struct PatternEngine {
    store: Arc<dyn EventStore>,
    settings: PatternSettings,
}

impl PatternEngine {
    pub fn new(store: Arc<dyn EventStore>, settings: PatternSettings) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> &PatternSettings {
        &self.settings
    }

    /// Summarize the window ending now
    pub fn summarize(&self, window: SummaryWindow) -> Result<PatternSummary> {
        self.summarize_at(window, time::now())
    }

    /// Summarize the window ending at `now`
    ///
    /// Malformed records are skipped and counted; they never abort the summary.
    pub fn summarize_at(&self, window: SummaryWindow, now: DateTime<Utc>) -> Result<PatternSummary> {
        let bounds = window.bounds(now);
        let records = self.store.query(bounds.prior_start, bounds.end)?;

        let mut current: Vec<&EventRecord> = Vec::new();
        let mut prior: Vec<&EventRecord> = Vec::new();
        let mut skipped_records = 0;

        for record in &records {
            if !record.result.is_well_formed() {
                warn!(
                    "Skipping malformed record {} (confidence={})",
                    record.id, record.result.confidence
                );
                skipped_records += 1;
                continue;
            }

            let timestamp = record.result.timestamp;
            if bounds.in_current(timestamp) {
                current.push(record);
            } else if bounds.in_prior(timestamp) {
                prior.push(record);
            }
        }

        let emotion_frequency = emotion_frequency(&current);
        let trigger_correlations = correlation::correlate(&current, self.settings.min_support);
        let trend = trend::compute_trend(&current, &prior);
        let insights = insights::generate(
            &current,
            &trigger_correlations,
            self.settings.utc_offset_minutes,
        );
        let recommendations =
            guidance::generate(&current, &emotion_frequency, self.settings.utc_offset_minutes);

        debug!(
            "Summarized {} window: {} current, {} prior, {} skipped, {} correlations",
            window,
            current.len(),
            prior.len(),
            skipped_records,
            trigger_correlations.len()
        );

        Ok(PatternSummary {
            window,
            window_start: bounds.current_start,
            window_end: bounds.end,
            total_records: current.len(),
            skipped_records,
            emotion_frequency,
            trigger_correlations,
            trend,
            insights,
            recommendations,
        })
    }

    /// Records in the window ending now whose dominant label is `label`
    pub fn emotion_history(
        &self,
        label: EmotionLabel,
        window: SummaryWindow,
    ) -> Result<Vec<EventRecord>> {
        self.emotion_history_at(label, window, time::now())
    }

    pub fn emotion_history_at(
        &self,
        label: EmotionLabel,
        window: SummaryWindow,
        now: DateTime<Utc>,
    ) -> Result<Vec<EventRecord>> {
        let bounds = window.bounds(now);
        let mut records = self.store.query(bounds.current_start, bounds.end)?;
        records.retain(|r| r.result.dominant_label == label);
        Ok(records)
    }
}

/// Count and share of each dominant label
pub fn emotion_frequency(records: &[&EventRecord]) -> BTreeMap<EmotionLabel, EmotionFrequency> {
    trend::count_labels(records)
        .into_iter()
        .map(|(label, count)| {
            (
                label,
                EmotionFrequency {
                    count,
                    percentage: trend::percentage(count, records.len()),
                },
            )
        })
        .collect()
}
