//! Event store: append-only, durable log of check-in records
//!
//! The store is the only shared mutable resource in the engine. Appends are
//! atomic per record and durable before they return; queries return records
//! ordered by timestamp, equal timestamps in insertion order.

pub mod jsonl;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::record::{EventRecord, RecordId};

pub use jsonl::JsonlEventStore;

/// Current on-disk record schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Append-only keyed event log
///
/// No update or delete: corrections are appended as new records.
pub trait EventStore: Send + Sync {
    /// Durably append a record and return its id
    fn append(&self, record: EventRecord) -> Result<RecordId>;

    /// Records with `since <= timestamp <= until`, ascending
    fn query(&self, since: DateTime<Utc>, until: DateTime<Utc>) -> Result<Vec<EventRecord>>;
}

impl<S: EventStore + ?Sized> EventStore for std::sync::Arc<S> {
    fn append(&self, record: EventRecord) -> Result<RecordId> {
        (**self).append(record)
    }

    fn query(&self, since: DateTime<Utc>, until: DateTime<Utc>) -> Result<Vec<EventRecord>> {
        (**self).query(since, until)
    }
}
