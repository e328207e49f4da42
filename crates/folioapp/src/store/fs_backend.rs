use super::backend::StorageBackend;
use crate::error::{FolioError, Result};
use crate::model::{Collection, Entity, SiteSettings};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const SETTINGS_FILE: &str = "settings.json";

/// JSON-file backend: one pretty-printed array per collection plus a
/// settings document, all inside `data_dir`.
pub struct FsBackend {
    data_dir: PathBuf,
}

impl FsBackend {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            fs::create_dir_all(&self.data_dir).map_err(FolioError::Io)?;
        }
        Ok(())
    }

    fn read_optional(&self, path: &Path) -> Result<Option<String>> {
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(path).map(Some).map_err(FolioError::Io)
    }

    /// Atomic write: tmp file in the same directory, then rename. The tmp
    /// file is removed when either step fails.
    fn write_atomic(&self, target: &Path, content: &str) -> Result<()> {
        self.ensure_dir()?;
        let stem = target
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("data");
        let tmp = self.data_dir.join(format!(".{}-{}.tmp", stem, Uuid::new_v4()));
        if let Err(err) = fs::write(&tmp, content).and_then(|_| fs::rename(&tmp, target)) {
            let _ = fs::remove_file(&tmp);
            return Err(FolioError::Io(err));
        }
        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn load_collection<T: Entity>(&self) -> Result<Vec<T>> {
        let path = self.collection_path(T::COLLECTION);
        match self.read_optional(&path)? {
            Some(content) if !content.trim().is_empty() => {
                let records: Vec<T> =
                    serde_json::from_str(&content).map_err(FolioError::Serialization)?;
                Ok(records)
            }
            _ => Ok(Vec::new()),
        }
    }

    fn save_collection<T: Entity>(&self, records: &[T]) -> Result<()> {
        let content = serde_json::to_string_pretty(records).map_err(FolioError::Serialization)?;
        self.write_atomic(&self.collection_path(T::COLLECTION), &content)?;
        tracing::debug!(
            collection = %T::COLLECTION,
            count = records.len(),
            "collection written"
        );
        Ok(())
    }

    fn load_settings(&self) -> Result<Option<SiteSettings>> {
        match self.read_optional(&self.data_dir.join(SETTINGS_FILE))? {
            Some(content) => Ok(Some(
                serde_json::from_str(&content).map_err(FolioError::Serialization)?,
            )),
            None => Ok(None),
        }
    }

    fn save_settings(&self, settings: &SiteSettings) -> Result<()> {
        let content =
            serde_json::to_string_pretty(settings).map_err(FolioError::Serialization)?;
        self.write_atomic(&self.data_dir.join(SETTINGS_FILE), &content)
    }

    fn collection_path(&self, collection: Collection) -> PathBuf {
        self.data_dir.join(collection.file_name())
    }
}
