//! Trigger tag extraction
//!
//! Turns check-in context (question answers, journal text, caller tags) into a
//! bounded, deterministic set of trigger tags. Extraction is pluggable through
//! [`TriggerExtractor`]; text-analysis collaborators can supply their own
//! implementation as long as identical context yields identical tags.

use std::collections::BTreeSet;
use tracing::debug;

use crate::record::CheckInContext;

/// Derives trigger tags from check-in context
pub trait TriggerExtractor: Send + Sync {
    /// Extract tags; must be deterministic for identical context
    fn extract(&self, context: &CheckInContext) -> BTreeSet<String>;
}

/// (question, answer, tag)
const ANSWER_TRIGGERS: &[(&str, &str, &str)] = &[
    ("energy_level", "low", "fatigue"),
    ("energy_level", "high", "overstimulation"),
    ("thoughts", "racing", "mental_overload"),
    ("thoughts", "stuck", "feeling_trapped"),
    ("physical", "tense", "physical_stress"),
    ("physical", "relaxed", "physical_comfort"),
    ("worry", "a_lot", "high_stress"),
    ("worry", "nothing", "low_stress"),
    ("need_most", "rest", "burnout"),
    ("need_most", "action", "restlessness"),
    ("need_most", "company", "loneliness"),
];

/// (tag, lowercase phrases that imply it)
const JOURNAL_TRIGGERS: &[(&str, &[&str])] = &[
    (
        "poor_sleep",
        &[
            "couldn't sleep",
            "can't sleep",
            "didn't sleep",
            "insomnia",
            "slept badly",
            "poor sleep",
            "no sleep",
            "up all night",
        ],
    ),
    ("work_pressure", &["deadline", "workload", "my boss", "at work"]),
    ("relationship_conflict", &["argument", "fight with", "argued"]),
    ("loneliness", &["lonely", "by myself", "no one to talk"]),
    ("financial_worry", &["money", "bills", "rent"]),
    ("health_concern", &["sick", "headache", "pain"]),
];

/// Normalize a free-text tag: trim, lowercase, whitespace/hyphens → `_`
pub fn normalize_tag(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// True if `phrase` occurs in `text` as whole words
///
/// "rent" matches "paid the rent" but not "parents" or "current".
pub fn contains_phrase(text: &str, phrase: &str) -> bool {
    let is_word_char = |c: char| c.is_alphanumeric();
    text.match_indices(phrase).any(|(start, matched)| {
        let before = text[..start].chars().next_back();
        let after = text[start + matched.len()..].chars().next();
        !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
    })
}

/// Default extractor over a fixed tag vocabulary
#[derive(Debug, Clone, Default)]
pub struct VocabularyTriggerExtractor;

impl VocabularyTriggerExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Every tag this extractor can emit
    pub fn vocabulary() -> BTreeSet<&'static str> {
        ANSWER_TRIGGERS
            .iter()
            .map(|(_, _, tag)| *tag)
            .chain(JOURNAL_TRIGGERS.iter().map(|(tag, _)| *tag))
            .collect()
    }
}

impl TriggerExtractor for VocabularyTriggerExtractor {
    fn extract(&self, context: &CheckInContext) -> BTreeSet<String> {
        let mut tags = BTreeSet::new();

        for (question, answer, tag) in ANSWER_TRIGGERS {
            if context.answers.get(*question).map(String::as_str) == Some(*answer) {
                tags.insert(tag.to_string());
            }
        }

        for entry in &context.journal_entries {
            let text = entry.to_lowercase();
            for (tag, phrases) in JOURNAL_TRIGGERS {
                if phrases.iter().any(|p| contains_phrase(&text, p)) {
                    tags.insert(tag.to_string());
                }
            }
        }

        let vocabulary = Self::vocabulary();
        for raw in &context.tags {
            let tag = normalize_tag(raw);
            if vocabulary.contains(tag.as_str()) {
                tags.insert(tag);
            } else {
                debug!("Dropping tag outside trigger vocabulary: {:?}", raw);
            }
        }

        tags
    }
}
