//! # Command Layer
//!
//! This module contains the **business rules** of folio. Each entity type has
//! its own submodule of pure functions taking a [`DataStore`](crate::store::DataStore).
//!
//! ## Role and Responsibilities
//!
//! - Validate references (categories, tags, media) before saving
//! - Derive fields: slugs, reading time, excerpts, manual order
//! - Keep tag usage counters in step with article tag sets
//! - Run listings through the [query engine](crate::query)
//! - Return structured [`CmdResult`]s, never formatted text
//!
//! Commands do no terminal I/O, no argument parsing and no prompting. The UI
//! decides how to render what comes back.
//!
//! ## Testing Strategy
//!
//! Command tests run against [`InMemoryStore`](crate::store::memory::InMemoryStore)
//! and live next to each command.
//!
//! ## Command Modules
//!
//! - [`articles`]: create, update, delete, restore, list, scheduled publishing, public feed
//! - [`categories`]: CRUD with parent validation and the category tree
//! - [`albums`]: CRUD and gallery ordering
//! - [`media`]: media library registration
//! - [`tags`]: tag registry with usage counts
//! - [`links`]: link hub entries
//! - [`settings`]: site appearance
//! - [`helpers`]: shared reference and slug checks

use crate::query::QueryPage;
use serde::Serialize;

pub mod albums;
pub mod articles;
pub mod categories;
pub mod helpers;
pub mod links;
pub mod media;
pub mod settings;
pub mod tags;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// What a command did.
///
/// - `affected`: records created or modified, in their post-operation state
/// - `listed`: one page of a listing, for list commands
/// - `messages`: leveled messages for the UI to show
#[derive(Debug, Clone, Serialize)]
pub struct CmdResult<T> {
    pub affected: Vec<T>,
    pub listed: Option<QueryPage<T>>,
    pub messages: Vec<CmdMessage>,
}

impl<T> Default for CmdResult<T> {
    fn default() -> Self {
        Self {
            affected: Vec::new(),
            listed: None,
            messages: Vec::new(),
        }
    }
}

impl<T> CmdResult<T> {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected(mut self, records: Vec<T>) -> Self {
        self.affected = records;
        self
    }

    pub fn with_listed(mut self, page: QueryPage<T>) -> Self {
        self.listed = Some(page);
        self
    }

    pub fn with_message(mut self, message: CmdMessage) -> Self {
        self.messages.push(message);
        self
    }

    /// Number of error messages, one per record a batch could not change.
    pub fn error_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.level == MessageLevel::Error)
            .count()
    }

    /// Appends another result's records and messages. A listing in `other`
    /// replaces ours.
    pub fn merge(&mut self, other: CmdResult<T>) {
        self.affected.extend(other.affected);
        self.messages.extend(other.messages);
        if other.listed.is_some() {
            self.listed = other.listed;
        }
    }
}

/// Knobs for fields derived from article content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentOptions {
    pub words_per_minute: u32,
    pub excerpt_length: usize,
}

impl From<&crate::config::FolioConfig> for ContentOptions {
    fn from(config: &crate::config::FolioConfig) -> Self {
        Self {
            words_per_minute: config.words_per_minute,
            excerpt_length: config.excerpt_length,
        }
    }
}
