// Fusion Quality - Coarse reliability grade for a fused decision
//
// Points: modality coverage (3+ → 2, 2 → 1), confidence (>0.8 → 2, >0.6 → 1),
// cross-modality agreement (2+ modalities voted for the winner → 1).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Quality grade of a fusion result
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FusionQuality {
    VeryLow,
    Low,
    Medium,
    High,
}

impl fmt::Display for FusionQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FusionQuality::VeryLow => write!(f, "very_low"),
            FusionQuality::Low => write!(f, "low"),
            FusionQuality::Medium => write!(f, "medium"),
            FusionQuality::High => write!(f, "high"),
        }
    }
}

/// Grade a fusion result
///
/// # Arguments
/// * `modality_count` - Number of modalities present
/// * `agreeing` - Number of modalities that voted for the dominant label
/// * `confidence` - Final fused confidence
pub fn assess_quality(modality_count: usize, agreeing: usize, confidence: f64) -> FusionQuality {
    let mut points = 0;

    if modality_count >= 3 {
        points += 2;
    } else if modality_count >= 2 {
        points += 1;
    }

    if confidence > 0.8 {
        points += 2;
    } else if confidence > 0.6 {
        points += 1;
    }

    if agreeing >= 2 {
        points += 1;
    }

    match points {
        p if p >= 4 => FusionQuality::High,
        p if p >= 2 => FusionQuality::Medium,
        1 => FusionQuality::Low,
        _ => FusionQuality::VeryLow,
    }
}
