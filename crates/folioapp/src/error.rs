use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum FolioError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: Uuid },

    #[error("No {kind} matches \"{reference}\"")]
    NoMatch { kind: &'static str, reference: String },

    #[error("\"{reference}\" matches {count} {kind} records, be more specific")]
    Ambiguous {
        kind: &'static str,
        reference: String,
        count: usize,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Category {id} still has {count} child categories")]
    HasChildren { id: Uuid, count: usize },

    #[error("Tag \"{name}\" is used by {count} articles")]
    TagInUse { name: String, count: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] confique::Error),

    #[error("Store error: {0}")]
    Store(String),
}

impl FolioError {
    pub fn validation(message: impl Into<String>) -> Self {
        FolioError::Validation(message.into())
    }
}

pub type Result<T> = std::result::Result<T, FolioError>;
