use crate::error::Result;
use crate::model::{Collection, Entity, SiteSettings};
use std::path::PathBuf;

/// Abstract interface for raw storage I/O.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while [`ContentStore`](super::content_store::ContentStore) handles the
/// "what" (tombstones, upserts, counters).
pub trait StorageBackend {
    // --- Collections ---

    /// Load every record of `T`'s collection, tombstoned ones included.
    /// A collection that was never written loads as empty.
    fn load_collection<T: Entity>(&self) -> Result<Vec<T>>;

    /// Replace the whole collection.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial writes.
    fn save_collection<T: Entity>(&self, records: &[T]) -> Result<()>;

    // --- Settings ---

    /// Load the settings document, `None` if it was never saved.
    fn load_settings(&self) -> Result<Option<SiteSettings>>;

    fn save_settings(&self, settings: &SiteSettings) -> Result<()>;

    // --- Paths ---

    /// Where a collection lives. For FsBackend this is the real path,
    /// for MemBackend a virtual one.
    fn collection_path(&self, collection: Collection) -> PathBuf;
}
