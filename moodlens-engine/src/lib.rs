//! # MoodLens Engine (moodlens-engine)
//!
//! Multi-modality emotion fusion and longitudinal pattern tracking.
//!
//! **Purpose:** Fuse normalized per-modality emotion signals (questions,
//! journaling, face, voice) into one label with a calibrated confidence,
//! persist each check-in to an append-only journal, and summarize the history
//! into trigger correlations and trends.
//!
//! **Architecture:** Synchronous, request-scoped engines around a single
//! shared [`store::EventStore`]; the `moodlens` binary is a thin CLI over
//! [`checkin::CheckInService`].

pub mod checkin;
pub mod error;
pub mod fusion;
pub mod patterns;
pub mod recommend;
pub mod record;
pub mod store;
pub mod triggers;

pub use checkin::{CheckInOutcome, CheckInRequest, CheckInService};
pub use error::{Error, Result};
pub use fusion::{FusionEngine, FusionResult};
pub use patterns::{PatternEngine, PatternSummary, SummaryWindow};
pub use record::{CheckInContext, EventRecord, RecordId};
pub use store::{EventStore, JsonlEventStore};
