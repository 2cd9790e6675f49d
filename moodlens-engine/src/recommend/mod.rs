//! Recommendation selection
//!
//! Maps a fused emotion and its trigger tags to a short, ordered list of
//! action ids drawn from an [`ActionCatalog`].

pub mod catalog;
pub mod selector;

pub use catalog::{ActionCatalog, ActionEntry, ActionHorizon};
pub use selector::{select, RecommendationSelector};
