//! # MoodLens Common Library
//!
//! Shared code for the MoodLens crates including:
//! - Emotion and modality data model
//! - Configuration loading (TOML bootstrap, root folder resolution)
//! - Common error type
//! - Time utilities

pub mod config;
pub mod error;
pub mod models;
pub mod time;

pub use error::{Error, Result};
pub use models::{EmotionLabel, Modality, ModalitySignal};
