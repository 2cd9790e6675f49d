//! Event store wrappers for failure injection and access accounting

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use moodlens_engine::store::EventStore;
use moodlens_engine::{Error, EventRecord, RecordId, Result};

/// Fails every append while `failing` is set
pub struct FlakyStore<S> {
    inner: S,
    failing: AtomicBool,
}

impl<S: EventStore> FlakyStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            failing: AtomicBool::new(true),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl<S: EventStore> EventStore for FlakyStore<S> {
    fn append(&self, record: EventRecord) -> Result<RecordId> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::store(
                "/unavailable/events.jsonl",
                std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
            ));
        }
        self.inner.append(record)
    }

    fn query(&self, since: DateTime<Utc>, until: DateTime<Utc>) -> Result<Vec<EventRecord>> {
        self.inner.query(since, until)
    }
}

/// Records every query range and how many records it returned
pub struct CountingStore<S> {
    inner: S,
    queries: Mutex<Vec<(DateTime<Utc>, DateTime<Utc>)>>,
    returned: AtomicUsize,
}

impl<S: EventStore> CountingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            queries: Mutex::new(Vec::new()),
            returned: AtomicUsize::new(0),
        }
    }

    pub fn queries(&self) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
        self.queries.lock().unwrap().clone()
    }

    pub fn records_returned(&self) -> usize {
        self.returned.load(Ordering::SeqCst)
    }
}

impl<S: EventStore> EventStore for CountingStore<S> {
    fn append(&self, record: EventRecord) -> Result<RecordId> {
        self.inner.append(record)
    }

    fn query(&self, since: DateTime<Utc>, until: DateTime<Utc>) -> Result<Vec<EventRecord>> {
        self.queries.lock().unwrap().push((since, until));
        let records = self.inner.query(since, until)?;
        self.returned.fetch_add(records.len(), Ordering::SeqCst);
        Ok(records)
    }
}
