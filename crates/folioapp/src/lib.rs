//! # Folio
//!
//! A content library for a small publishing site: articles, categories,
//! photo albums, a media library, tags and a link hub.
//!
//! ## Architecture
//!
//! ```text
//! UI (CLI, web, ...)
//!   │
//!   ▼
//! api::FolioApi        selectors → ids, config-driven default queries
//!   │
//!   ▼
//! commands::*          business rules, return CmdResult<T>
//!   │         │
//!   ▼         ▼
//! query::run  store::DataStore   pure list engine │ tombstone-aware persistence
//!               │
//!               ▼
//!           StorageBackend (FsBackend | MemBackend)
//! ```
//!
//! Every layer below the API is free of terminal I/O. The [`query`] engine is
//! pure and works on any [`query::Listable`] collection, so UIs can also run it
//! over records they loaded themselves.
//!
//! ## Modules
//!
//! - [`api`]: the facade UIs talk to
//! - [`commands`]: one module per entity
//! - [`query`]: search, filter, sort and pagination
//! - [`store`]: persistence with soft delete
//! - [`model`]: the entity types
//! - [`selector`]: resolving user references to records
//! - [`text`]: slugs, excerpts and reading time from markdown
//! - [`config`]: layered configuration
//! - [`error`]: the error type

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod query;
pub mod selector;
pub mod store;
pub mod text;

pub use api::FolioApi;
pub use error::{FolioError, Result};
