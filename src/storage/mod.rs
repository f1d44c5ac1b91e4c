pub mod json_backend;
pub mod memory;
pub mod records;

use crate::errors::LedgerResult;

/// Record holding the ordered category array.
pub const CATEGORIES_KEY: &str = "categories";
/// Record holding the month-key → monthly data object.
pub const MONTHLY_DATA_KEY: &str = "monthly-data";

/// Abstraction over key-value persistence holding whole JSON documents.
///
/// Values are replaced wholesale on every `set`; there are no partial writes.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> LedgerResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> LedgerResult<()>;
    fn remove(&self, key: &str) -> LedgerResult<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> LedgerResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> LedgerResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> LedgerResult<()> {
        (**self).remove(key)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> LedgerResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> LedgerResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> LedgerResult<()> {
        (**self).remove(key)
    }
}

pub use json_backend::JsonFileStore;
pub use memory::MemoryStore;
pub use records::LoadReport;
