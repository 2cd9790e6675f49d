//! Shared data model: emotion labels, modalities and normalized modality signals
//!
//! These are the only shapes the core accepts from the external classifiers.
//! Face, voice and text models normalize their output into a [`ModalitySignal`]
//! before anything reaches the fusion engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Closed set of emotion categories
///
/// Adding a category means updating every weight table, catalog entry and
/// trigger mapping that enumerates labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionLabel {
    Anxious,
    Sad,
    Frustrated,
    Overwhelmed,
    Calm,
    Happy,
    Neutral,
    Tired,
}

impl EmotionLabel {
    /// All labels in declaration order
    pub const ALL: [EmotionLabel; 8] = [
        EmotionLabel::Anxious,
        EmotionLabel::Sad,
        EmotionLabel::Frustrated,
        EmotionLabel::Overwhelmed,
        EmotionLabel::Calm,
        EmotionLabel::Happy,
        EmotionLabel::Neutral,
        EmotionLabel::Tired,
    ];

    /// Stable identifier used in storage and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionLabel::Anxious => "anxious",
            EmotionLabel::Sad => "sad",
            EmotionLabel::Frustrated => "frustrated",
            EmotionLabel::Overwhelmed => "overwhelmed",
            EmotionLabel::Calm => "calm",
            EmotionLabel::Happy => "happy",
            EmotionLabel::Neutral => "neutral",
            EmotionLabel::Tired => "tired",
        }
    }

    /// Human-readable name for display surfaces
    pub fn display_name(&self) -> &'static str {
        match self {
            EmotionLabel::Anxious => "Anxious/Worried",
            EmotionLabel::Sad => "Sad/Down",
            EmotionLabel::Frustrated => "Frustrated/Angry",
            EmotionLabel::Overwhelmed => "Overwhelmed",
            EmotionLabel::Calm => "Calm/Peaceful",
            EmotionLabel::Happy => "Happy/Energized",
            EmotionLabel::Neutral => "Neutral/Flat",
            EmotionLabel::Tired => "Tired/Drained",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            EmotionLabel::Anxious => "Racing thoughts, tension, worry",
            EmotionLabel::Sad => "Low energy, withdrawn, tearful",
            EmotionLabel::Frustrated => "Tense, irritable, ready to explode",
            EmotionLabel::Overwhelmed => "Too much, stuck, can't cope",
            EmotionLabel::Calm => "Relaxed, balanced, content",
            EmotionLabel::Happy => "Positive, energized, upbeat",
            EmotionLabel::Neutral => "Flat, okay, not much either way",
            EmotionLabel::Tired => "Exhausted, depleted, need rest",
        }
    }
}

impl fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmotionLabel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        EmotionLabel::ALL
            .iter()
            .copied()
            .find(|label| label.as_str() == wanted)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown emotion label: {}", s)))
    }
}

/// Independent channel of emotional signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    Questions,
    Journaling,
    Face,
    Voice,
}

impl Modality {
    /// All modalities in declaration order
    pub const ALL: [Modality; 4] = [
        Modality::Questions,
        Modality::Journaling,
        Modality::Face,
        Modality::Voice,
    ];

    /// Modalities ordered by tie-break priority, highest first
    pub const BY_PRIORITY: [Modality; 4] = [
        Modality::Journaling,
        Modality::Questions,
        Modality::Face,
        Modality::Voice,
    ];

    /// Tie-break rank (0 = highest priority)
    pub fn priority_rank(&self) -> usize {
        match self {
            Modality::Journaling => 0,
            Modality::Questions => 1,
            Modality::Face => 2,
            Modality::Voice => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Questions => "questions",
            Modality::Journaling => "journaling",
            Modality::Face => "face",
            Modality::Voice => "voice",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Modality {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Modality::ALL
            .iter()
            .copied()
            .find(|modality| modality.as_str() == wanted)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown modality: {}", s)))
    }
}

/// Normalized classifier output for one modality
///
/// `confidence` is expected in [0.0, 1.0]; the fusion engine rejects anything else.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModalitySignal {
    pub modality: Modality,
    pub label: EmotionLabel,
    pub confidence: f64,
}

impl ModalitySignal {
    pub fn new(modality: Modality, label: EmotionLabel, confidence: f64) -> Self {
        Self {
            modality,
            label,
            confidence,
        }
    }

    /// True if confidence is finite and within [0.0, 1.0]
    pub fn has_valid_confidence(&self) -> bool {
        self.confidence.is_finite() && (0.0..=1.0).contains(&self.confidence)
    }
}

impl FromStr for ModalitySignal {
    type Err = Error;

    /// Parse `modality=label:confidence`, e.g. `journaling=anxious:0.9`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (modality, rest) = s
            .split_once('=')
            .ok_or_else(|| Error::InvalidInput(format!("Expected modality=label:confidence, got '{}'", s)))?;
        let (label, confidence) = rest
            .split_once(':')
            .ok_or_else(|| Error::InvalidInput(format!("Expected label:confidence, got '{}'", rest)))?;
        let confidence = confidence
            .trim()
            .parse::<f64>()
            .map_err(|e| Error::InvalidInput(format!("Invalid confidence '{}': {}", confidence, e)))?;

        Ok(Self {
            modality: modality.parse()?,
            label: label.parse()?,
            confidence,
        })
    }
}
