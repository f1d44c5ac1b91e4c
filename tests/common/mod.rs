#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use finance_ledger::{
    core::time::FixedClock,
    errors::{LedgerError, LedgerResult},
    storage::{JsonFileStore, KeyValueStore, MemoryStore},
    FinanceStore,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Store viewing `year`/`month`, backed by a memory store the caller can inspect.
pub fn memory_store_at(year: i32, month: u32) -> (FinanceStore, Arc<MemoryStore>) {
    let backend = Arc::new(MemoryStore::new());
    let store = store_on(Box::new(backend.clone()), year, month);
    (store, backend)
}

pub fn store_on(storage: Box<dyn KeyValueStore>, year: i32, month: u32) -> FinanceStore {
    FinanceStore::with_clock(storage, Box::new(FixedClock::on(date(year, month, 15))))
}

/// Creates an isolated data directory for each test.
pub fn temp_data_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().join("data");
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

pub fn file_store(dir: &Path) -> JsonFileStore {
    JsonFileStore::new(dir).expect("create json file store")
}

/// Reads normally and rejects every write.
#[derive(Debug, Default)]
pub struct ReadOnlyStore {
    inner: MemoryStore,
}

impl KeyValueStore for ReadOnlyStore {
    fn get(&self, key: &str) -> LedgerResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, _key: &str, _value: &str) -> LedgerResult<()> {
        Err(LedgerError::Persistence("quota exceeded".into()))
    }

    fn remove(&self, _key: &str) -> LedgerResult<()> {
        Err(LedgerError::Persistence("quota exceeded".into()))
    }
}
