//! Persisted key-value store
//!
//! The ledger's state survives restarts in a small key-value store, one string
//! value per key:
//!
//! - `globalVisitorCounter` → string-encoded integer
//! - `todayVisitorCounter` → JSON `{date, count}`
//! - `visitorData` → JSON array of [`VisitRecord`]
//!
//! Reads never fail: a missing key, unreadable file, or malformed value is
//! treated as absent state and read back as the zero value. Writes are
//! read-modify-write with no locking across processes; the last writer wins.

use crate::storage::error::StoreResult;
use crate::storage::types::{DailyCounter, VisitRecord};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Key for the persisted global counter
pub const GLOBAL_COUNTER_KEY: &str = "globalVisitorCounter";
/// Key for the persisted daily counter
pub const TODAY_COUNTER_KEY: &str = "todayVisitorCounter";
/// Key for the persisted visit record set
pub const VISITOR_DATA_KEY: &str = "visitorData";

/// Minimal string key-value storage seam
///
/// The ledger is handed a boxed implementation so tests can swap the file
/// store for an in-memory one.
pub trait KeyValueStore: Send + Sync {
    /// Read a value; `None` when the key is absent or the backend is unreadable
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: String) -> StoreResult<()>;
}

/// File-backed store: one JSON object mapping keys to string values
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`, loading any existing entries.
    ///
    /// A missing file starts empty; a malformed file is logged and also starts
    /// empty, matching the silent-default policy for persisted state.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<HashMap<String, String>>(&content) {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Malformed store file, starting empty");
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };

        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    fn persist(&self, entries: &HashMap<String, String>) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: String) -> StoreResult<()> {
        let mut entries = match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.insert(key.to_string(), value);
        self.persist(&entries)
    }
}

/// In-memory store for tests and dry runs
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: String) -> StoreResult<()> {
        let mut entries = match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// Typed accessors over the raw key-value layout
pub struct VisitStore {
    inner: Box<dyn KeyValueStore>,
}

impl VisitStore {
    /// Store backed by a JSON file under `path`
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self {
            inner: Box::new(FileStore::open(path.as_ref())),
        }
    }

    /// Store backed by memory only
    pub fn in_memory() -> Self {
        Self {
            inner: Box::new(MemoryStore::new()),
        }
    }

    /// Store over any key-value backend
    pub fn with_backend(backend: Box<dyn KeyValueStore>) -> Self {
        Self { inner: backend }
    }

    /// Persisted global counter; absent or unparsable reads as 0
    pub fn global_counter(&self) -> u64 {
        self.inner
            .get(GLOBAL_COUNTER_KEY)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0)
    }

    pub fn set_global_counter(&self, value: u64) -> StoreResult<()> {
        self.inner.set(GLOBAL_COUNTER_KEY, value.to_string())
    }

    /// Persisted daily counter; absent or shape-mismatched reads as `None`
    pub fn daily_counter(&self) -> Option<DailyCounter> {
        let raw = self.inner.get(TODAY_COUNTER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(counter) => Some(counter),
            Err(e) => {
                tracing::debug!(error = %e, "Stored daily counter malformed, treating as absent");
                None
            }
        }
    }

    pub fn set_daily_counter(&self, counter: &DailyCounter) -> StoreResult<()> {
        let raw = serde_json::to_string(counter)?;
        self.inner.set(TODAY_COUNTER_KEY, raw)
    }

    /// Persisted visit records; absent or shape-mismatched reads as empty
    pub fn visit_records(&self) -> Vec<VisitRecord> {
        let Some(raw) = self.inner.get(VISITOR_DATA_KEY) else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(e) => {
                tracing::debug!(error = %e, "Stored visit records malformed, treating as empty");
                Vec::new()
            }
        }
    }

    pub fn set_visit_records(&self, records: &[VisitRecord]) -> StoreResult<()> {
        let raw = serde_json::to_string(records)?;
        self.inner.set(VISITOR_DATA_KEY, raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_empty_store_reads_zero_state() {
        let store = VisitStore::in_memory();
        assert_eq!(store.global_counter(), 0);
        assert!(store.daily_counter().is_none());
        assert!(store.visit_records().is_empty());
    }

    #[test]
    fn test_global_counter_round_trip() {
        let store = VisitStore::in_memory();
        store.set_global_counter(42).unwrap();
        assert_eq!(store.global_counter(), 42);
    }

    #[test]
    fn test_unparsable_global_counter_reads_zero() {
        let backend = MemoryStore::new();
        backend
            .set(GLOBAL_COUNTER_KEY, "not-a-number".into())
            .unwrap();
        let store = VisitStore::with_backend(Box::new(backend));
        assert_eq!(store.global_counter(), 0);
    }

    #[test]
    fn test_malformed_daily_counter_reads_absent() {
        let backend = MemoryStore::new();
        backend
            .set(TODAY_COUNTER_KEY, r#"{"date": 7}"#.into())
            .unwrap();
        let store = VisitStore::with_backend(Box::new(backend));
        assert!(store.daily_counter().is_none());
    }

    #[test]
    fn test_malformed_visit_records_read_empty() {
        let backend = MemoryStore::new();
        backend.set(VISITOR_DATA_KEY, "{broken".into()).unwrap();
        let store = VisitStore::with_backend(Box::new(backend));
        assert!(store.visit_records().is_empty());
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = VisitStore::open(&path);
        store.set_global_counter(7).unwrap();
        let counter = DailyCounter {
            date: "2025-01-01".into(),
            count: 2,
        };
        store.set_daily_counter(&counter).unwrap();
        drop(store);

        let reopened = VisitStore::open(&path);
        assert_eq!(reopened.global_counter(), 7);
        assert_eq!(reopened.daily_counter().unwrap(), counter);
    }

    #[test]
    fn test_file_store_malformed_file_starts_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "not json at all").unwrap();

        let store = VisitStore::open(&path);
        assert_eq!(store.global_counter(), 0);
    }

    #[test]
    fn test_visit_records_persist_camel_case() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = VisitStore::open(&path);
        let record = VisitRecord::new(
            39.08,
            117.2,
            "Tianjin, Tianjin, China",
            "2025-01-01",
            "2025-01-01T08:00:00Z",
        );
        store.set_visit_records(&[record]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("regionLabel"));
    }
}
