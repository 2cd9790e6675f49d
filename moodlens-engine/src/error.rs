//! Error types for moodlens-engine
//!
//! Defines engine-specific error types using thiserror for clear error propagation.

use std::path::PathBuf;

use moodlens_common::Modality;
use thiserror::Error;

use crate::record::EventRecord;

/// Main error type for the fusion, storage and pattern engines
#[derive(Error, Debug)]
pub enum Error {
    /// Fusion called without any modality signal
    #[error("Insufficient signals: at least one modality is required")]
    InsufficientSignal,

    /// Modality confidence outside [0.0, 1.0] (or not a number)
    #[error("Invalid confidence for {modality}: {value} (expected 0.0-1.0)")]
    InvalidConfidence { modality: Modality, value: f64 },

    /// Same modality supplied more than once in a single fusion call
    #[error("Duplicate signal for modality: {0}")]
    DuplicateModality(Modality),

    /// Event store append or query failed
    #[error("Event store unavailable ({path:?}): {source}")]
    StoreUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Record (de)serialization failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid engine configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from the common library
    #[error(transparent)]
    Common(#[from] moodlens_common::Error),

    /// Check-in completed but its record could not be persisted
    ///
    /// The finished record is handed back so the caller can retry the append
    /// without recomputing the fusion.
    #[error("Check-in {} not persisted: {source}", .record.id)]
    Unpersisted {
        record: Box<EventRecord>,
        source: Box<Error>,
    },
}

/// Convenience Result type using the engine Error
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wrap an I/O failure on the event journal
    pub fn store(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::StoreUnavailable {
            path: path.into(),
            source,
        }
    }
}
