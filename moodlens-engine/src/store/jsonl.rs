//! JSON Lines event journal
//!
//! One `{"schema_version":1,"record":{...}}` object per line. Each append is
//! written as a single buffer and `sync_data`'d before returning. A torn
//! trailing line from a crash is skipped on open and terminated before the
//! next append, so earlier history always stays parseable.
//!
//! Parsed records are mirrored in a timestamp-sorted timeline; range queries
//! binary-search it and only touch records inside the range.
//!
//! Record ids are unique in the timeline. A line whose fsync failed may still
//! be on disk when the caller retries, so a repeated id keeps its first
//! occurrence: later copies are skipped on open and not written again on append.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use tracing::{debug, info, warn};

use super::{EventStore, SCHEMA_VERSION};
use crate::error::{Error, Result};
use crate::record::{EventRecord, RecordId};

#[derive(Serialize)]
struct JournalLineRef<'a> {
    schema_version: u32,
    record: &'a EventRecord,
}

#[derive(Deserialize)]
struct JournalLine {
    schema_version: u32,
    record: EventRecord,
}

struct Journal {
    file: File,
    timeline: Vec<EventRecord>,
    ids: HashSet<RecordId>,
    ends_with_newline: bool,
}

/// Durable append-only event store backed by a JSONL file
pub struct JsonlEventStore {
    path: PathBuf,
    skipped_on_open: usize,
    journal: RwLock<Journal>,
}

impl std::fmt::Debug for JsonlEventStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonlEventStore")
            .field("path", &self.path)
            .field("records", &self.len())
            .finish()
    }
}

impl JsonlEventStore {
    /// Open (or create) the journal at `path` and load its history
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| Error::store(&path, e))?;
        }

        let LoadedJournal {
            timeline,
            ids,
            skipped,
            ends_with_newline,
        } = load_journal(&path)?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| Error::store(&path, e))?;

        info!(
            "Opened event journal {:?}: {} records, {} skipped",
            path,
            timeline.len(),
            skipped
        );

        Ok(Self {
            path,
            skipped_on_open: skipped,
            journal: RwLock::new(Journal {
                file,
                timeline,
                ids,
                ends_with_newline,
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of readable records
    pub fn len(&self) -> usize {
        self.journal
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .timeline
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lines skipped when the journal was opened (unparseable, unsupported or repeated ids)
    pub fn skipped_on_open(&self) -> usize {
        self.skipped_on_open
    }
}

impl EventStore for JsonlEventStore {
    fn append(&self, record: EventRecord) -> Result<RecordId> {
        let line = serde_json::to_vec(&JournalLineRef {
            schema_version: SCHEMA_VERSION,
            record: &record,
        })?;

        let mut journal = self.journal.write().unwrap_or_else(PoisonError::into_inner);

        if journal.ids.contains(&record.id) {
            debug!("Record {} already stored, not appending again", record.id);
            return Ok(record.id);
        }

        let mut buf = Vec::with_capacity(line.len() + 2);
        if !journal.ends_with_newline {
            buf.push(b'\n');
        }
        buf.extend_from_slice(&line);
        buf.push(b'\n');

        let written = journal
            .file
            .write_all(&buf)
            .and_then(|_| journal.file.sync_data());

        if let Err(e) = written {
            // A partial write may have left an unterminated line behind
            journal.ends_with_newline = false;
            return Err(Error::store(&self.path, e));
        }
        journal.ends_with_newline = true;

        let id = record.id;
        debug!(
            "Appended record {} ({} @ {})",
            id, record.result.dominant_label, record.result.timestamp
        );
        journal.ids.insert(id);
        insert_ordered(&mut journal.timeline, record);

        Ok(id)
    }

    fn query(&self, since: DateTime<Utc>, until: DateTime<Utc>) -> Result<Vec<EventRecord>> {
        if since > until {
            return Ok(Vec::new());
        }

        let journal = self.journal.read().unwrap_or_else(PoisonError::into_inner);
        let timeline = &journal.timeline;

        let start = timeline.partition_point(|r| r.result.timestamp < since);
        let end = timeline.partition_point(|r| r.result.timestamp <= until);

        Ok(timeline[start..end].to_vec())
    }
}

/// Insert after every record with timestamp <= the new one
///
/// In-order appends land at the end; a late record with an older timestamp
/// still ends up after its equal-timestamp predecessors.
fn insert_ordered(timeline: &mut Vec<EventRecord>, record: EventRecord) {
    let ts = record.result.timestamp;
    let pos = timeline.partition_point(|r| r.result.timestamp <= ts);
    timeline.insert(pos, record);
}

struct LoadedJournal {
    timeline: Vec<EventRecord>,
    ids: HashSet<RecordId>,
    skipped: usize,
    ends_with_newline: bool,
}

/// Load every parseable record with a not-yet-seen id
fn load_journal(path: &Path) -> Result<LoadedJournal> {
    let mut loaded = LoadedJournal {
        timeline: Vec::new(),
        ids: HashSet::new(),
        skipped: 0,
        ends_with_newline: true,
    };
    if !path.exists() {
        return Ok(loaded);
    }

    let bytes = std::fs::read(path).map_err(|e| Error::store(path, e))?;
    loaded.ends_with_newline = bytes.last().map_or(true, |b| *b == b'\n');

    for (line_no, line) in bytes.split(|b| *b == b'\n').enumerate() {
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }

        match serde_json::from_slice::<JournalLine>(line) {
            Ok(entry) if entry.schema_version == SCHEMA_VERSION => {
                if loaded.ids.insert(entry.record.id) {
                    insert_ordered(&mut loaded.timeline, entry.record);
                } else {
                    warn!(
                        "Skipping duplicate record {} at journal line {} in {:?}",
                        entry.record.id,
                        line_no + 1,
                        path
                    );
                    loaded.skipped += 1;
                }
            }
            Ok(entry) => {
                warn!(
                    "Skipping journal line {} in {:?}: unsupported schema_version={}",
                    line_no + 1,
                    path,
                    entry.schema_version
                );
                loaded.skipped += 1;
            }
            Err(e) => {
                warn!(
                    "Skipping malformed journal line {} in {:?}: {}",
                    line_no + 1,
                    path,
                    e
                );
                loaded.skipped += 1;
            }
        }
    }

    Ok(loaded)
}
