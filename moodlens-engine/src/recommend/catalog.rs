//! Action catalog
//!
//! Coping actions the selector can recommend. The built-in catalog covers
//! every emotion label with immediate and short-term actions; a custom catalog
//! can be loaded from TOML:
//!
//! ```toml
//! [[actions]]
//! id = "box-breathing"
//! title = "Box Breathing"
//! kind = "breathing"
//! duration = "4 min"
//! horizon = "immediate"
//! emotions = ["anxious", "overwhelmed"]
//! triggers = ["high_stress"]
//! ```

use moodlens_common::EmotionLabel;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::path::Path;
use tracing::info;

use crate::error::{Error, Result};

/// When an action is meant to be done
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionHorizon {
    #[default]
    Immediate,
    ShortTerm,
}

/// One recommendable action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionEntry {
    pub id: String,
    pub title: String,

    /// Category such as "breathing" or "social"
    pub kind: String,

    /// Human-readable duration ("2 min")
    pub duration: String,

    #[serde(default)]
    pub horizon: ActionHorizon,

    /// Labels this action helps with
    #[serde(default)]
    pub emotions: BTreeSet<EmotionLabel>,

    /// Trigger tags this action addresses
    #[serde(default)]
    pub triggers: BTreeSet<String>,
}

impl ActionEntry {
    pub fn matches_emotion(&self, label: EmotionLabel) -> bool {
        self.emotions.contains(&label)
    }

    pub fn matches_any_trigger(&self, triggers: &BTreeSet<String>) -> bool {
        self.triggers.iter().any(|t| triggers.contains(t))
    }
}

#[derive(Debug, Deserialize, Serialize)]
struct CatalogFile {
    #[serde(default)]
    actions: Vec<ActionEntry>,
}

/// Ordered collection of actions with unique ids
#[derive(Debug, Clone, PartialEq)]
pub struct ActionCatalog {
    entries: Vec<ActionEntry>,
}

impl ActionCatalog {
    /// Build a catalog, rejecting empty or duplicate ids
    pub fn from_entries(entries: Vec<ActionEntry>) -> Result<Self> {
        let mut ids = HashSet::new();
        for entry in &entries {
            if entry.id.trim().is_empty() {
                return Err(Error::Config(format!(
                    "Action {:?} has an empty id",
                    entry.title
                )));
            }
            if !ids.insert(entry.id.as_str()) {
                return Err(Error::Config(format!(
                    "Duplicate action id in catalog: {}",
                    entry.id
                )));
            }
        }
        Ok(Self { entries })
    }

    /// Parse a catalog from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse action catalog: {}", e)))?;
        Self::from_entries(file.actions)
    }

    /// Load a catalog from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read action catalog {:?}: {}", path, e))
        })?;
        let catalog = Self::from_toml_str(&content)?;
        info!("Loaded {} actions from {:?}", catalog.len(), path);
        Ok(catalog)
    }

    /// Serialize the catalog back to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(&CatalogFile {
            actions: self.entries.clone(),
        })
        .map_err(|e| Error::Config(format!("Failed to serialize action catalog: {}", e)))
    }

    pub fn entries(&self) -> &[ActionEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&ActionEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ActionCatalog {
    fn default() -> Self {
        let entries = BUILT_IN
            .iter()
            .map(|(id, title, kind, duration, horizon, emotions, triggers)| ActionEntry {
                id: id.to_string(),
                title: title.to_string(),
                kind: kind.to_string(),
                duration: duration.to_string(),
                horizon: *horizon,
                emotions: emotions.iter().copied().collect(),
                triggers: triggers.iter().map(|t| t.to_string()).collect(),
            })
            .collect();
        Self { entries }
    }
}

use ActionHorizon::{Immediate, ShortTerm};
use EmotionLabel::{Anxious, Calm, Frustrated, Happy, Neutral, Overwhelmed, Sad, Tired};

type BuiltInEntry = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    ActionHorizon,
    &'static [EmotionLabel],
    &'static [&'static str],
);

/// (id, title, kind, duration, horizon, emotions, triggers)
#[rustfmt::skip]
const BUILT_IN: &[BuiltInEntry] = &[
    // Anxious
    ("three-deep-breaths", "3 Deep Breaths", "breathing", "2 min", Immediate, &[Anxious], &["high_stress", "mental_overload"]),
    ("grounding-54321", "5-4-3-2-1 Grounding", "grounding", "3 min", Immediate, &[Anxious], &["mental_overload"]),
    ("quick-body-scan", "Quick Body Scan", "mindfulness", "2 min", Immediate, &[Anxious], &["physical_stress"]),
    ("ten-minute-walk", "Take a 10-minute walk", "movement", "10 min", ShortTerm, &[Anxious], &["restlessness"]),
    ("write-worries", "Write down your worries", "journaling", "15 min", ShortTerm, &[Anxious], &["high_stress", "financial_worry", "health_concern"]),
    ("text-a-friend", "Text a supportive friend", "social", "5 min", ShortTerm, &[Anxious], &["loneliness"]),
    // Sad
    ("gentle-self-hug", "Gentle Self-Hug", "self-care", "1 min", Immediate, &[Sad], &[]),
    ("comforting-music", "Listen to Comforting Music", "audio", "5 min", Immediate, &[Sad], &[]),
    ("happy-photos", "Look at Happy Photos", "visual", "3 min", Immediate, &[Sad], &[]),
    ("warm-shower", "Take a warm shower", "self-care", "15 min", ShortTerm, &[Sad], &["physical_stress"]),
    ("call-someone", "Call someone you love", "social", "20 min", ShortTerm, &[Sad], &["loneliness", "relationship_conflict"]),
    ("something-creative", "Do something creative", "expression", "30 min", ShortTerm, &[Sad, Calm], &["feeling_trapped"]),
    // Frustrated
    ("jumping-jacks", "10 Jumping Jacks", "movement", "1 min", Immediate, &[Frustrated], &["restlessness", "overstimulation"]),
    ("pillow-scream", "Scream into Pillow", "release", "30 sec", Immediate, &[Frustrated], &[]),
    ("write-frustrations", "Write Frustrations Down", "journaling", "3 min", Immediate, &[Frustrated], &["work_pressure"]),
    ("run-or-workout", "Go for a run or workout", "movement", "30 min", ShortTerm, &[Frustrated], &["restlessness"]),
    ("talk-it-through", "Talk to someone about it", "social", "20 min", ShortTerm, &[Frustrated], &["relationship_conflict"]),
    ("something-productive", "Do something productive", "action", "45 min", ShortTerm, &[Frustrated], &["feeling_trapped"]),
    // Overwhelmed
    ("brain-dump", "Brain Dump Everything", "journaling", "5 min", Immediate, &[Overwhelmed], &["mental_overload", "work_pressure"]),
    ("pick-one-thing", "Pick Just ONE Thing", "focus", "2 min", Immediate, &[Overwhelmed], &["work_pressure"]),
    ("five-deep-breaths", "Take 5 Deep Breaths", "breathing", "2 min", Immediate, &[Overwhelmed], &["high_stress"]),
    ("simple-todo-list", "Make a simple to-do list", "organization", "10 min", ShortTerm, &[Overwhelmed], &["work_pressure"]),
    ("say-no", "Say no to one thing", "boundaries", "5 min", ShortTerm, &[Overwhelmed], &["burnout"]),
    ("ask-for-help", "Ask for help", "social", "15 min", ShortTerm, &[Overwhelmed], &["burnout", "financial_worry"]),
    // Calm
    ("savor-moment", "Savor This Moment", "mindfulness", "2 min", Immediate, &[Calm], &["low_stress"]),
    ("gentle-stretching", "Gentle Stretching", "movement", "5 min", Immediate, &[Calm, Tired], &["physical_stress"]),
    ("gratitude-practice", "Gratitude Practice", "mindfulness", "3 min", Immediate, &[Calm], &[]),
    ("plan-enjoyable", "Plan something you enjoy", "planning", "20 min", ShortTerm, &[Calm], &[]),
    ("meaningful-conversation", "Have a meaningful conversation", "social", "30 min", ShortTerm, &[Calm], &["loneliness"]),
    // Happy
    ("share-joy", "Share Your Joy", "social", "2 min", Immediate, &[Happy], &[]),
    ("dance-or-move", "Dance or Move", "movement", "3 min", Immediate, &[Happy], &[]),
    ("write-whats-good", "Write Down What's Good", "journaling", "3 min", Immediate, &[Happy], &[]),
    ("something-fun", "Do something fun", "enjoyment", "30 min", ShortTerm, &[Happy], &[]),
    ("help-someone", "Help someone else", "service", "20 min", ShortTerm, &[Happy], &[]),
    ("plan-good-things", "Plan more good things", "planning", "15 min", ShortTerm, &[Happy], &[]),
    // Neutral
    ("body-check-in", "Check In With Body", "mindfulness", "2 min", Immediate, &[Neutral], &["physical_comfort"]),
    ("something-small", "Do Something Small", "action", "5 min", Immediate, &[Neutral], &[]),
    ("connect-someone", "Connect With Someone", "social", "3 min", Immediate, &[Neutral], &["loneliness"]),
    ("try-something-new", "Try something new", "exploration", "30 min", ShortTerm, &[Neutral], &[]),
    ("reflect-needs", "Reflect on your needs", "journaling", "20 min", ShortTerm, &[Neutral], &[]),
    ("something-meaningful", "Do something meaningful", "purpose", "45 min", ShortTerm, &[Neutral], &[]),
    // Tired
    ("rest-eyes", "Rest Your Eyes", "rest", "3 min", Immediate, &[Tired], &["fatigue"]),
    ("drink-water", "Drink Water", "self-care", "1 min", Immediate, &[Tired], &["fatigue", "health_concern"]),
    ("take-a-nap", "Take a nap", "rest", "20 min", ShortTerm, &[Tired], &["fatigue", "poor_sleep"]),
    ("early-bedtime", "Go to bed early", "rest", "8 hours", ShortTerm, &[Tired], &["poor_sleep", "burnout"]),
    ("reduce-commitments", "Reduce commitments", "boundaries", "10 min", ShortTerm, &[Tired], &["burnout", "overstimulation"]),
];
