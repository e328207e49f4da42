//! # Configuration
//!
//! Folio configuration is managed by [`confique`], which layers sources in
//! priority order:
//!
//! 1. **Environment variables**: `FOLIO_PAGE_SIZE`, `FOLIO_DATA_DIR`, etc.
//! 2. **Project file**: `folio.toml` in the working directory (or the path
//!    passed to [`FolioConfig::load`]).
//! 3. **Compiled defaults**: `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Env | Default | Description |
//! |-----|-----|---------|-------------|
//! | `page_size` | `FOLIO_PAGE_SIZE` | `10` | Rows per listing page |
//! | `words_per_minute` | `FOLIO_WORDS_PER_MINUTE` | `200` | Reading speed for reading time |
//! | `excerpt_length` | `FOLIO_EXCERPT_LENGTH` | `160` | Characters in generated excerpts |
//! | `article_sort` | `FOLIO_ARTICLE_SORT` | `date-desc` | Default article order |
//! | `category_sort` | `FOLIO_CATEGORY_SORT` | `order-asc` | Default category order |
//! | `tag_sort` | `FOLIO_TAG_SORT` | `order-desc` | Default tag order (most used first) |
//! | `link_sort` | `FOLIO_LINK_SORT` | `order-asc` | Default link order |
//! | `data_dir` | `FOLIO_DATA_DIR` | platform data dir | Where collections are stored |

use crate::error::Result;
use crate::query::SortMode;
use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "folio.toml";

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FolioConfig {
    /// Rows per listing page.
    #[config(env = "FOLIO_PAGE_SIZE", default = 10)]
    pub page_size: usize,

    /// Reading speed used to estimate article reading time.
    #[config(env = "FOLIO_WORDS_PER_MINUTE", default = 200)]
    pub words_per_minute: u32,

    /// Length of excerpts generated for articles without one.
    #[config(env = "FOLIO_EXCERPT_LENGTH", default = 160)]
    pub excerpt_length: usize,

    #[config(env = "FOLIO_ARTICLE_SORT", default = "date-desc")]
    pub article_sort: String,

    #[config(env = "FOLIO_CATEGORY_SORT", default = "order-asc")]
    pub category_sort: String,

    #[config(env = "FOLIO_TAG_SORT", default = "order-desc")]
    pub tag_sort: String,

    #[config(env = "FOLIO_LINK_SORT", default = "order-asc")]
    pub link_sort: String,

    /// Data directory. When absent, the platform data directory is used.
    #[config(env = "FOLIO_DATA_DIR")]
    pub data_dir: Option<PathBuf>,
}

impl FolioConfig {
    /// The compiled defaults alone, without environment or file.
    pub fn defaults() -> Result<Self> {
        Ok(FolioConfig::builder().load()?)
    }

    /// Loads environment, then `file` (ignored when missing), then defaults.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let file = file.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
        let config = FolioConfig::builder().env().file(file.clone()).load()?;
        tracing::debug!(file = %file.display(), "configuration loaded");
        Ok(config)
    }

    pub fn article_sort(&self) -> SortMode {
        SortMode::from_key(&self.article_sort)
    }

    pub fn category_sort(&self) -> SortMode {
        SortMode::from_key(&self.category_sort)
    }

    pub fn tag_sort(&self) -> SortMode {
        SortMode::from_key(&self.tag_sort)
    }

    pub fn link_sort(&self) -> SortMode {
        SortMode::from_key(&self.link_sort)
    }

    /// Configured data dir, else the platform data dir, else `./.folio`.
    pub fn data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        ProjectDirs::from("", "", "folio")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".folio"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_config() {
        let config = FolioConfig::defaults().unwrap();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.words_per_minute, 200);
        assert_eq!(config.article_sort(), SortMode::DateDesc);
        assert_eq!(config.tag_sort(), SortMode::OrderDesc);
        assert_eq!(config.data_dir, None);
    }

    #[test]
    fn test_unknown_sort_key_falls_back() {
        let config = FolioConfig {
            link_sort: "random".to_string(),
            ..FolioConfig::defaults().unwrap()
        };
        assert_eq!(config.link_sort(), SortMode::Original);
    }

    #[test]
    fn test_explicit_data_dir() {
        let config = FolioConfig {
            data_dir: Some(PathBuf::from("/tmp/folio-data")),
            ..FolioConfig::defaults().unwrap()
        };
        assert_eq!(config.data_dir(), PathBuf::from("/tmp/folio-data"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "page_size = 25\narticle_sort = \"az-asc\"\n").unwrap();

        let config = FolioConfig::load(Some(&path)).unwrap();
        assert_eq!(config.page_size, 25);
        assert_eq!(config.article_sort(), SortMode::AzAsc);
        assert_eq!(config.words_per_minute, 200);
    }

    #[test]
    fn test_load_rejects_bad_types() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "page_size = \"lots\"\n").unwrap();
        assert!(FolioConfig::load(Some(&path)).is_err());
    }
}
