use super::backend::StorageBackend;
use crate::error::{FolioError, Result};
use crate::model::{Collection, Entity, SiteSettings};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

/// In-memory storage backend for testing.
///
/// Records are kept as serialized JSON so a round trip through this backend
/// behaves like one through the filesystem. `RefCell` gives the `&self`
/// methods interior mutability; folio is single-threaded.
#[derive(Default)]
pub struct MemBackend {
    collections: RefCell<HashMap<Collection, Value>>,
    settings: RefCell<Option<SiteSettings>>,
    simulate_write_error: RefCell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    /// Test helper: replaces a collection with arbitrary JSON, bypassing
    /// the typed API.
    pub fn put_raw(&self, collection: Collection, value: Value) {
        self.collections.borrow_mut().insert(collection, value);
    }

    fn check_writable(&self) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(FolioError::Store("Simulated write error".to_string()));
        }
        Ok(())
    }
}

impl StorageBackend for MemBackend {
    fn load_collection<T: Entity>(&self) -> Result<Vec<T>> {
        let collections = self.collections.borrow();
        match collections.get(&T::COLLECTION) {
            Some(value) => Ok(serde_json::from_value(value.clone())?),
            None => Ok(Vec::new()),
        }
    }

    fn save_collection<T: Entity>(&self, records: &[T]) -> Result<()> {
        self.check_writable()?;
        let value = serde_json::to_value(records)?;
        self.collections.borrow_mut().insert(T::COLLECTION, value);
        Ok(())
    }

    fn load_settings(&self) -> Result<Option<SiteSettings>> {
        Ok(self.settings.borrow().clone())
    }

    fn save_settings(&self, settings: &SiteSettings) -> Result<()> {
        self.check_writable()?;
        *self.settings.borrow_mut() = Some(settings.clone());
        Ok(())
    }

    fn collection_path(&self, collection: Collection) -> PathBuf {
        PathBuf::from(format!("memory://{}", collection.file_name()))
    }
}
