//! Check-in orchestration
//!
//! One check-in runs: signal validation and fusion, trigger extraction,
//! recommendation selection, record construction, durable append. Every step
//! before the append is pure, so a failed append hands the finished record back
//! inside [`Error::Unpersisted`] and [`CheckInService::retry_append`] can store
//! it later without fusing again.

use chrono::{DateTime, Utc};
use moodlens_common::config::TomlConfig;
use moodlens_common::{time, EmotionLabel, ModalitySignal};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::fusion::FusionEngine;
use crate::patterns::{PatternEngine, PatternSummary, SummaryWindow};
use crate::recommend::{ActionCatalog, ActionEntry, RecommendationSelector};
use crate::record::{CheckInContext, EventRecord};
use crate::store::EventStore;
use crate::triggers::{TriggerExtractor, VocabularyTriggerExtractor};

/// Input of one check-in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckInRequest {
    pub signals: Vec<ModalitySignal>,

    #[serde(default)]
    pub context: CheckInContext,

    /// Defaults to the current time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl CheckInRequest {
    pub fn new(signals: Vec<ModalitySignal>) -> Self {
        Self {
            signals,
            context: CheckInContext::default(),
            timestamp: None,
        }
    }

    pub fn with_context(mut self, context: CheckInContext) -> Self {
        self.context = context;
        self
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// Persisted record plus the catalog entries behind its recommendations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckInOutcome {
    pub record: EventRecord,
    pub actions: Vec<ActionEntry>,
}

/// Runs check-ins and answers history questions against one event store
pub struct CheckInService {
    fusion: FusionEngine,
    extractor: Arc<dyn TriggerExtractor>,
    selector: RecommendationSelector,
    store: Arc<dyn EventStore>,
    patterns: PatternEngine,
}

impl CheckInService {
    pub fn new(
        store: Arc<dyn EventStore>,
        fusion: FusionEngine,
        selector: RecommendationSelector,
        patterns: PatternEngine,
    ) -> Self {
        Self {
            fusion,
            extractor: Arc::new(VocabularyTriggerExtractor::new()),
            selector,
            store,
            patterns,
        }
    }

    /// Build every component from the bootstrap configuration
    pub fn from_config(store: Arc<dyn EventStore>, config: &TomlConfig) -> Result<Self> {
        let fusion = FusionEngine::new(config.fusion.weights)?;

        let catalog = match &config.recommendations.catalog_path {
            Some(path) => ActionCatalog::load(path)?,
            None => ActionCatalog::default(),
        };
        let selector =
            RecommendationSelector::new(catalog, config.recommendations.max_recommendations);

        let patterns = PatternEngine::new(store.clone(), config.patterns.clone());

        Ok(Self::new(store, fusion, selector, patterns))
    }

    /// Replace the default trigger extractor
    pub fn with_extractor(mut self, extractor: Arc<dyn TriggerExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn fusion(&self) -> &FusionEngine {
        &self.fusion
    }

    pub fn patterns(&self) -> &PatternEngine {
        &self.patterns
    }

    /// Fuse, recommend and persist one check-in
    ///
    /// # Errors
    /// * Fusion errors (`InsufficientSignal`, `InvalidConfidence`, `DuplicateModality`)
    ///   before anything is computed or stored
    /// * `Unpersisted` when the record was built but the append failed
    pub fn check_in(&self, request: CheckInRequest) -> Result<CheckInOutcome> {
        let timestamp = request.timestamp.unwrap_or_else(time::now);
        let triggers = self.extractor.extract(&request.context);

        let result = self.fusion.fuse_at(&request.signals, triggers, timestamp)?;
        let recommendations = self.selector.select(result.dominant_label, &result.triggers);
        let record = EventRecord::new(result, recommendations, request.context);

        self.persist(record)
    }

    /// Append a record returned inside `Unpersisted`
    pub fn retry_append(&self, record: EventRecord) -> Result<CheckInOutcome> {
        info!("Retrying append of check-in {}", record.id);
        self.persist(record)
    }

    pub fn summarize(&self, window: SummaryWindow) -> Result<PatternSummary> {
        self.patterns.summarize(window)
    }

    pub fn emotion_history(
        &self,
        label: EmotionLabel,
        window: SummaryWindow,
    ) -> Result<Vec<EventRecord>> {
        self.patterns.emotion_history(label, window)
    }

    fn persist(&self, record: EventRecord) -> Result<CheckInOutcome> {
        match self.store.append(record.clone()) {
            Ok(id) => {
                info!(
                    "Check-in {} stored: {} ({:.2})",
                    id, record.result.dominant_label, record.result.confidence
                );
                let actions = record
                    .recommendations
                    .iter()
                    .filter_map(|id| self.selector.catalog().get(id).cloned())
                    .collect();
                Ok(CheckInOutcome { record, actions })
            }
            Err(source) => {
                warn!("Check-in {} not persisted: {}", record.id, source);
                Err(Error::Unpersisted {
                    record: Box::new(record),
                    source: Box::new(source),
                })
            }
        }
    }
}
