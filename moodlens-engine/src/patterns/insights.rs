// Insights - Short human-readable observations over the current window
//
// most_common_emotion (medium), trigger_pattern (high), time_pattern (low),
// recent_trend (medium).

use moodlens_common::{time, EmotionLabel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::correlation::{strongest_per_trigger, TriggerCorrelation};
use super::trend::count_labels;
use crate::record::EventRecord;

/// Records considered for time-of-day patterns
const TIME_PATTERN_RECENT: usize = 10;

/// Minimum window size before time-of-day patterns are reported
const TIME_PATTERN_MIN_RECORDS: usize = 3;

/// Records that must share a label to report a recent trend
const RECENT_TREND_LENGTH: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    MostCommonEmotion,
    TriggerPattern,
    TimePattern,
    RecentTrend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightPriority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub priority: InsightPriority,
    pub emotion: EmotionLabel,
    pub text: String,
}

/// Time-of-day bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DayPeriod {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl DayPeriod {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => DayPeriod::Morning,
            12..=16 => DayPeriod::Afternoon,
            17..=20 => DayPeriod::Evening,
            _ => DayPeriod::Night,
        }
    }
}

impl fmt::Display for DayPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DayPeriod::Morning => "morning",
            DayPeriod::Afternoon => "afternoon",
            DayPeriod::Evening => "evening",
            DayPeriod::Night => "night",
        };
        write!(f, "{}", name)
    }
}

/// Generate insights for the current window
///
/// # Arguments
/// * `records` - Current window records, ascending by timestamp
/// * `correlations` - Trigger correlations for the same records
/// * `utc_offset_minutes` - Offset used to bucket records into day periods
pub fn generate(
    records: &[&EventRecord],
    correlations: &[TriggerCorrelation],
    utc_offset_minutes: i32,
) -> Vec<Insight> {
    let mut insights = Vec::new();

    if let Some(insight) = most_common_emotion(records) {
        insights.push(insight);
    }
    insights.extend(trigger_patterns(correlations));
    insights.extend(time_patterns(records, utc_offset_minutes));
    if let Some(insight) = recent_trend(records) {
        insights.push(insight);
    }

    insights
}

fn most_common_emotion(records: &[&EventRecord]) -> Option<Insight> {
    // Ties resolve to the earliest label in enumeration order
    let (emotion, count) = count_labels(records)
        .into_iter()
        .fold(None, |best: Option<(EmotionLabel, usize)>, (label, count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((label, count)),
        })?;

    Some(Insight {
        kind: InsightKind::MostCommonEmotion,
        priority: InsightPriority::Medium,
        emotion,
        text: format!("You've felt {} most often ({} times)", emotion, count),
    })
}

fn trigger_patterns(correlations: &[TriggerCorrelation]) -> Vec<Insight> {
    strongest_per_trigger(correlations)
        .into_iter()
        .filter(|c| c.occurrences >= 2)
        .map(|c| Insight {
            kind: InsightKind::TriggerPattern,
            priority: InsightPriority::High,
            emotion: c.emotion,
            text: format!(
                "When you experience {}, you often feel {}",
                c.trigger.replace('_', " "),
                c.emotion
            ),
        })
        .collect()
}

fn time_patterns(records: &[&EventRecord], utc_offset_minutes: i32) -> Vec<Insight> {
    if records.len() < TIME_PATTERN_MIN_RECORDS {
        return Vec::new();
    }

    let recent = &records[records.len().saturating_sub(TIME_PATTERN_RECENT)..];

    let mut by_period: BTreeMap<DayPeriod, Vec<&EventRecord>> = BTreeMap::new();
    for record in recent {
        let hour = time::local_hour(record.result.timestamp, utc_offset_minutes);
        by_period
            .entry(DayPeriod::from_hour(hour))
            .or_default()
            .push(*record);
    }

    by_period
        .into_iter()
        .filter_map(|(period, period_records)| {
            let (emotion, count) = count_labels(&period_records)
                .into_iter()
                .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))?;
            (count >= 2).then(|| Insight {
                kind: InsightKind::TimePattern,
                priority: InsightPriority::Low,
                emotion,
                text: format!("You often feel {} during the {}", emotion, period),
            })
        })
        .collect()
}

fn recent_trend(records: &[&EventRecord]) -> Option<Insight> {
    if records.len() < RECENT_TREND_LENGTH {
        return None;
    }

    let tail = &records[records.len() - RECENT_TREND_LENGTH..];
    let emotion = tail[0].result.dominant_label;
    if !tail.iter().all(|r| r.result.dominant_label == emotion) {
        return None;
    }

    Some(Insight {
        kind: InsightKind::RecentTrend,
        priority: InsightPriority::Medium,
        emotion,
        text: format!("You've been feeling {} consistently", emotion),
    })
}
