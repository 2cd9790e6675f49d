// Guidance - Pattern-level suggestions for the summary window
//
// dominant emotion (>= 50% of check-ins) → emotion-specific advice
// check-in count (>= 5 / >= 2 / fewer) → frequency feedback
// mean local hour of the last 3 check-ins (< 10 / > 18) → timing advice
// At most three lines; nothing for an empty window.

use moodlens_common::{time, EmotionLabel};
use std::collections::BTreeMap;

use super::EmotionFrequency;
use crate::record::EventRecord;

/// Upper bound on guidance lines per summary
pub const MAX_GUIDANCE: usize = 3;

/// Share of check-ins at which one emotion counts as dominant
const DOMINANT_PERCENTAGE: f64 = 50.0;

/// Check-ins considered for timing advice
const TIMING_RECENT: usize = 3;

/// Generate guidance for the current window
///
/// # Arguments
/// * `records` - Current window records, ascending by timestamp
/// * `frequency` - Label frequencies of the same records
/// * `utc_offset_minutes` - Offset used to read check-in hours
pub fn generate(
    records: &[&EventRecord],
    frequency: &BTreeMap<EmotionLabel, EmotionFrequency>,
    utc_offset_minutes: i32,
) -> Vec<String> {
    if records.is_empty() {
        return Vec::new();
    }

    let mut guidance = Vec::new();

    if let Some(line) = dominant_emotion_advice(frequency) {
        guidance.push(line.to_string());
    }

    guidance.push(frequency_feedback(records.len()).to_string());

    if let Some(line) = timing_advice(records, utc_offset_minutes) {
        guidance.push(line.to_string());
    }

    guidance.truncate(MAX_GUIDANCE);
    guidance
}

fn dominant_emotion_advice(
    frequency: &BTreeMap<EmotionLabel, EmotionFrequency>,
) -> Option<&'static str> {
    // max_by_key keeps the last maximum, so iterate in reverse for the earliest label
    let (label, freq) = frequency.iter().rev().max_by_key(|(_, f)| f.count)?;

    if freq.percentage < DOMINANT_PERCENTAGE {
        return None;
    }

    match label {
        EmotionLabel::Anxious => Some("Consider daily stress management techniques"),
        EmotionLabel::Sad => Some("You might benefit from talking to someone"),
        EmotionLabel::Overwhelmed => Some("Try breaking tasks into smaller steps"),
        EmotionLabel::Tired => Some("Consider your sleep schedule and rest needs"),
        _ => None,
    }
}

fn frequency_feedback(check_ins: usize) -> &'static str {
    match check_ins {
        n if n >= 5 => "Great job checking in regularly!",
        n if n >= 2 => "Consider checking in daily for better insights",
        _ => "Try checking in more often to build patterns",
    }
}

fn timing_advice(records: &[&EventRecord], utc_offset_minutes: i32) -> Option<&'static str> {
    let recent = &records[records.len().saturating_sub(TIMING_RECENT)..];
    if recent.is_empty() {
        return None;
    }

    let hours: u32 = recent
        .iter()
        .map(|r| time::local_hour(r.result.timestamp, utc_offset_minutes))
        .sum();
    let mean_hour = f64::from(hours) / recent.len() as f64;

    if mean_hour < 10.0 {
        Some("You tend to check in early - consider evening reflection too")
    } else if mean_hour > 18.0 {
        Some("You check in late - morning check-ins might help start your day")
    } else {
        None
    }
}
