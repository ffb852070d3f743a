//! In-memory collaborators for testing.
//!
//! [`MemoryStore`] implements both [`NameSource`] and [`RecordResolver`]
//! over a sorted in-memory record map, with hooks for scripting the races a
//! real storage backend can exhibit (names vanishing between enumeration and
//! resolution, stale records needing resynthesis, enumeration failures).
//!
//! # Feature Flag
//!
//! Outside this crate's own tests, this module is only available when the
//! `test-utils` feature is enabled:
//!
//! ```toml
//! [dev-dependencies]
//! veld-core = { version = "...", features = ["test-utils"] }
//! ```

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use jiff::Timestamp;

use crate::error::BoxedError;
use crate::source::{NameSource, RecordResolver, Resolution};
use crate::types::{DIR_CONTENT_TYPE, FILE_CONTENT_TYPE, ObjectType, Record};

#[derive(Default)]
struct Inner {
    records: BTreeMap<String, Record>,
    invalid: HashSet<String>,
    vanished: HashSet<String>,
    vanish_on_synthesis: HashSet<String>,
    enumeration_failure: Option<String>,
}

/// An in-memory name source and record resolver.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    enumerate_calls: AtomicUsize,
    resolve_calls: AtomicUsize,
    synthesize_calls: AtomicUsize,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record under its own name.
    pub fn insert(&self, record: Record) {
        let mut inner = self.inner.lock().unwrap();
        inner.records.insert(record.name.clone(), record);
    }

    /// Inserts a regular file record with a deterministic etag.
    pub fn insert_file(&self, name: &str, size: u64) {
        self.insert(Record::new(
            name,
            Timestamp::UNIX_EPOCH,
            size,
            FILE_CONTENT_TYPE,
            format!("etag-{name}"),
        ));
    }

    /// Inserts a directory record of the given object type.
    pub fn insert_dir(&self, name: &str, object_type: ObjectType) {
        self.insert(
            Record::new(name, Timestamp::UNIX_EPOCH, 0, DIR_CONTENT_TYPE, "")
                .with_object_type(object_type),
        );
    }

    /// Marks a name's stored record as failing validation; resolution
    /// reports it as invalid until it is resynthesized.
    pub fn mark_invalid(&self, name: &str) {
        self.inner.lock().unwrap().invalid.insert(name.to_owned());
    }

    /// Scripts the benign race: the name still enumerates, but resolution
    /// finds it gone.
    pub fn mark_vanished(&self, name: &str) {
        self.inner.lock().unwrap().vanished.insert(name.to_owned());
    }

    /// Scripts the race hitting mid-synthesis: resolution reports the record
    /// invalid, and synthesis then finds the name gone.
    pub fn mark_vanishing_on_synthesis(&self, name: &str) {
        self.inner
            .lock()
            .unwrap()
            .vanish_on_synthesis
            .insert(name.to_owned());
    }

    /// Makes every subsequent enumeration fail with the given message.
    pub fn fail_enumeration(&self, message: &str) {
        self.inner.lock().unwrap().enumeration_failure = Some(message.to_owned());
    }

    /// Number of enumeration calls observed.
    pub fn enumerate_calls(&self) -> usize {
        self.enumerate_calls.load(Ordering::Relaxed)
    }

    /// Number of resolve calls observed.
    pub fn resolve_calls(&self) -> usize {
        self.resolve_calls.load(Ordering::Relaxed)
    }

    /// Number of synthesize calls observed.
    pub fn synthesize_calls(&self) -> usize {
        self.synthesize_calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl NameSource for MemoryStore {
    async fn enumerate(&self) -> Result<Vec<String>, BoxedError> {
        self.enumerate_calls.fetch_add(1, Ordering::Relaxed);
        let inner = self.inner.lock().unwrap();
        if let Some(message) = &inner.enumeration_failure {
            return Err(message.clone().into());
        }
        Ok(inner.records.keys().cloned().collect())
    }
}

#[async_trait]
impl RecordResolver for MemoryStore {
    async fn resolve(&self, name: &str) -> Result<Resolution, BoxedError> {
        self.resolve_calls.fetch_add(1, Ordering::Relaxed);
        let inner = self.inner.lock().unwrap();
        if inner.vanished.contains(name) || !inner.records.contains_key(name) {
            return Ok(Resolution::Missing);
        }
        if inner.invalid.contains(name) {
            return Ok(Resolution::Invalid);
        }
        Ok(Resolution::Found(inner.records[name].clone()))
    }

    async fn synthesize(&self, name: &str) -> Result<Option<Record>, BoxedError> {
        self.synthesize_calls.fetch_add(1, Ordering::Relaxed);
        let mut inner = self.inner.lock().unwrap();
        if inner.vanished.contains(name) || inner.vanish_on_synthesis.contains(name) {
            return Ok(None);
        }
        inner.invalid.remove(name);
        Ok(inner.records.get(name).cloned())
    }
}
