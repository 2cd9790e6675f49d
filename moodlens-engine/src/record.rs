//! Event records: a fusion result plus the context it was derived from

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use uuid::Uuid;

use crate::fusion::FusionResult;

/// Identifier assigned to every event record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub Uuid);

impl RecordId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Free-form check-in context used to derive trigger tags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckInContext {
    /// Structured question answers (question id → answer id)
    #[serde(default)]
    pub answers: BTreeMap<String, String>,

    /// Free-text journaling responses
    #[serde(default)]
    pub journal_entries: Vec<String>,

    /// Caller-supplied tags such as "poor sleep"
    #[serde(default)]
    pub tags: BTreeSet<String>,

    /// Action the user picked after seeing recommendations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_action: Option<String>,
}

impl CheckInContext {
    pub fn with_answer(mut self, question: &str, answer: &str) -> Self {
        self.answers.insert(question.to_string(), answer.to_string());
        self
    }

    pub fn with_journal_entry(mut self, text: &str) -> Self {
        self.journal_entries.push(text.to_string());
        self
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tags.insert(tag.to_string());
        self
    }
}

/// Append-only log entry owned by the event store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: RecordId,
    pub result: FusionResult,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub context: CheckInContext,
}

impl EventRecord {
    pub fn new(result: FusionResult, recommendations: Vec<String>, context: CheckInContext) -> Self {
        Self {
            id: RecordId::new(),
            result,
            recommendations,
            context,
        }
    }
}
