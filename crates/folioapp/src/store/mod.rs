//! # Storage Layer
//!
//! The [`DataStore`] trait is everything the command layer knows about
//! persistence. It is generic over [`Entity`], so one set of operations serves
//! all six collections.
//!
//! ## Tombstones
//!
//! Nothing is ever physically removed. Deleting flips the record's `deleted`
//! flag, and the store applies the tombstone filter on every normal read:
//!
//! - [`DataStore::get`] reports a deleted record as not found.
//! - [`DataStore::list`] only returns live records.
//! - [`DataStore::list_deleted`] and [`DataStore::restore`] are the only ways
//!   to reach a tombstoned record.
//!
//! Callers therefore never filter `deleted` themselves.
//!
//! ## Counters
//!
//! Tag usage counts are adjusted with [`DataStore::adjust_tag_usage`], which
//! applies a whole batch of increments and decrements as one
//! read-modify-write of the tag collection. Counts saturate at zero.
//!
//! ## Implementations
//!
//! - [`content_store::ContentStore`]: the store logic, generic over a
//!   [`backend::StorageBackend`].
//! - [`fs_backend::FsBackend`]: one JSON file per collection.
//! - [`mem_backend::MemBackend`] / [`memory::InMemoryStore`]: for testing
//!   logic without filesystem I/O.
//!
//! ## Storage Layout
//!
//! ```text
//! <data_dir>/
//! ├── articles.json
//! ├── categories.json
//! ├── albums.json
//! ├── media.json
//! ├── tags.json
//! ├── links.json
//! └── settings.json
//! ```

use crate::error::Result;
use crate::model::{Entity, SiteSettings};
use uuid::Uuid;

pub mod backend;
pub mod content_store;
pub mod fs_backend;
pub mod mem_backend;
pub mod memory;

pub use content_store::ContentStore;

/// Production store: JSON files in a data directory.
pub type FileStore = ContentStore<fs_backend::FsBackend>;

impl FileStore {
    pub fn open(data_dir: impl Into<std::path::PathBuf>) -> Self {
        ContentStore::with_backend(fs_backend::FsBackend::new(data_dir))
    }
}

/// Abstract interface for content storage.
pub trait DataStore {
    /// Insert or replace a record, keyed by id.
    fn save<T: Entity>(&mut self, record: &T) -> Result<()>;

    /// Insert or replace several records of one collection in a single write.
    fn save_many<T: Entity>(&mut self, records: &[T]) -> Result<()>;

    /// Get a live record by id.
    fn get<T: Entity>(&self, id: &Uuid) -> Result<T>;

    /// All live records, in storage order.
    fn list<T: Entity>(&self) -> Result<Vec<T>>;

    /// All tombstoned records, in storage order.
    fn list_deleted<T: Entity>(&self) -> Result<Vec<T>>;

    /// Tombstone a live record and return it.
    fn soft_delete<T: Entity>(&mut self, id: &Uuid) -> Result<T>;

    /// Bring a tombstoned record back and return it.
    fn restore<T: Entity>(&mut self, id: &Uuid) -> Result<T>;

    /// Increment usage of `added` tags and decrement `removed` ones.
    fn adjust_tag_usage(&mut self, added: &[Uuid], removed: &[Uuid]) -> Result<()>;

    /// Current settings, or defaults if none were saved.
    fn settings(&self) -> Result<SiteSettings>;

    fn save_settings(&mut self, settings: &SiteSettings) -> Result<()>;
}
