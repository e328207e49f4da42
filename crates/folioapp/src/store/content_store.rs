use super::backend::StorageBackend;
use super::DataStore;
use crate::error::{FolioError, Result};
use crate::model::{Entity, SiteSettings, Tag};
use std::collections::HashMap;
use uuid::Uuid;

pub struct ContentStore<B: StorageBackend> {
    /// The underlying storage backend.
    /// Exposed as pub(crate) for testing and internal access only.
    pub(crate) backend: B,
}

impl<B: StorageBackend> ContentStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Loads the collection, flips the tombstone of `id` to `deleted` and
    /// writes it back. `id` must currently be in the opposite state.
    fn set_tombstone<T: Entity>(&mut self, id: &Uuid, deleted: bool) -> Result<T> {
        let mut records: Vec<T> = self.backend.load_collection()?;
        let record = records
            .iter_mut()
            .find(|r| r.id() == *id && r.is_deleted() != deleted)
            .ok_or(FolioError::NotFound {
                kind: T::KIND,
                id: *id,
            })?;
        record.set_deleted(deleted);
        let updated = record.clone();
        self.backend.save_collection(&records)?;
        Ok(updated)
    }
}

fn upsert<T: Entity>(records: &mut Vec<T>, record: &T) {
    match records.iter_mut().find(|r| r.id() == record.id()) {
        Some(existing) => *existing = record.clone(),
        None => records.push(record.clone()),
    }
}

impl<B: StorageBackend> DataStore for ContentStore<B> {
    fn save<T: Entity>(&mut self, record: &T) -> Result<()> {
        let mut records: Vec<T> = self.backend.load_collection()?;
        upsert(&mut records, record);
        self.backend.save_collection(&records)
    }

    fn save_many<T: Entity>(&mut self, batch: &[T]) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }
        let mut records: Vec<T> = self.backend.load_collection()?;
        for record in batch {
            upsert(&mut records, record);
        }
        self.backend.save_collection(&records)
    }

    fn get<T: Entity>(&self, id: &Uuid) -> Result<T> {
        let records: Vec<T> = self.backend.load_collection()?;
        records
            .into_iter()
            .find(|r| r.id() == *id && !r.is_deleted())
            .ok_or(FolioError::NotFound {
                kind: T::KIND,
                id: *id,
            })
    }

    fn list<T: Entity>(&self) -> Result<Vec<T>> {
        let records: Vec<T> = self.backend.load_collection()?;
        Ok(records.into_iter().filter(|r| !r.is_deleted()).collect())
    }

    fn list_deleted<T: Entity>(&self) -> Result<Vec<T>> {
        let records: Vec<T> = self.backend.load_collection()?;
        Ok(records.into_iter().filter(|r| r.is_deleted()).collect())
    }

    fn soft_delete<T: Entity>(&mut self, id: &Uuid) -> Result<T> {
        self.set_tombstone(id, true)
    }

    fn restore<T: Entity>(&mut self, id: &Uuid) -> Result<T> {
        self.set_tombstone(id, false)
    }

    fn adjust_tag_usage(&mut self, added: &[Uuid], removed: &[Uuid]) -> Result<()> {
        if added.is_empty() && removed.is_empty() {
            return Ok(());
        }

        let mut deltas: HashMap<Uuid, i64> = HashMap::new();
        for id in added {
            *deltas.entry(*id).or_default() += 1;
        }
        for id in removed {
            *deltas.entry(*id).or_default() -= 1;
        }

        let mut tags: Vec<Tag> = self.backend.load_collection()?;
        for tag in tags.iter_mut() {
            if let Some(delta) = deltas.get(&tag.id) {
                let next = (i64::from(tag.usage_count) + delta).clamp(0, i64::from(u32::MAX));
                tag.usage_count = u32::try_from(next).unwrap_or(0);
            }
        }
        self.backend.save_collection(&tags)?;

        tracing::debug!(
            added = added.len(),
            removed = removed.len(),
            "tag usage adjusted"
        );
        Ok(())
    }

    fn settings(&self) -> Result<SiteSettings> {
        Ok(self.backend.load_settings()?.unwrap_or_default())
    }

    fn save_settings(&mut self, settings: &SiteSettings) -> Result<()> {
        self.backend.save_settings(settings)
    }
}
