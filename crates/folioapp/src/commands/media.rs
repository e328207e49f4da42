//! Media library commands. Folio only tracks media records; the files
//! themselves live wherever `file_name` points.

use super::helpers::require_text;
use super::{CmdMessage, CmdResult};
use crate::error::{FolioError, Result};
use crate::model::{Album, Article, Media};
use crate::query::{self, ListQuery};
use crate::store::DataStore;
use std::path::Path;
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct NewMedia {
    pub file_name: String,
    pub title: String,
    pub alt: String,
    /// Guessed from the file extension when absent.
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MediaUpdate {
    pub title: Option<String>,
    pub alt: Option<String>,
    pub mime_type: Option<Option<String>>,
}

/// MIME type for common web media extensions.
pub fn guess_mime(file_name: &str) -> Option<&'static str> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())?
        .to_ascii_lowercase();
    let mime = match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "svg" => "image/svg+xml",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mp3" => "audio/mpeg",
        "pdf" => "application/pdf",
        _ => return None,
    };
    Some(mime)
}

pub fn register<S: DataStore>(store: &mut S, input: NewMedia) -> Result<CmdResult<Media>> {
    let file_name = require_text(&input.file_name, "File name")?;
    let existing: Vec<Media> = store.list()?;
    if existing.iter().any(|m| m.file_name == file_name) {
        return Err(FolioError::validation(format!(
            "Media already registered: {}",
            file_name
        )));
    }

    let mut media = Media::new(file_name);
    media.title = input.title.trim().to_string();
    media.alt = input.alt.trim().to_string();
    media.mime_type = input
        .mime_type
        .or_else(|| guess_mime(&media.file_name).map(str::to_string));

    store.save(&media)?;
    tracing::info!(id = %media.id, file = %media.file_name, "media registered");

    Ok(CmdResult::default()
        .with_message(CmdMessage::success(format!(
            "Media registered: {}",
            media.file_name
        )))
        .with_affected(vec![media]))
}

pub fn update<S: DataStore>(
    store: &mut S,
    id: &Uuid,
    changes: MediaUpdate,
) -> Result<CmdResult<Media>> {
    let mut media: Media = store.get(id)?;
    if let Some(title) = changes.title {
        media.title = title.trim().to_string();
    }
    if let Some(alt) = changes.alt {
        media.alt = alt.trim().to_string();
    }
    if let Some(mime_type) = changes.mime_type {
        media.mime_type = mime_type;
    }
    store.save(&media)?;

    Ok(CmdResult::default()
        .with_message(CmdMessage::success(format!(
            "Media updated: {}",
            media.file_name
        )))
        .with_affected(vec![media]))
}

/// Soft-deletes media. References from albums and article covers are left
/// in place and reported as a warning.
pub fn delete<S: DataStore>(store: &mut S, id: &Uuid) -> Result<CmdResult<Media>> {
    let media: Media = store.soft_delete(id)?;
    tracing::info!(id = %media.id, "media deleted");

    let albums: Vec<Album> = store.list()?;
    let articles: Vec<Article> = store.list()?;
    let references = albums
        .iter()
        .filter(|a| a.media_ids.contains(id) || a.cover_media_id == Some(*id))
        .count()
        + articles
            .iter()
            .filter(|a| a.cover_media_id == Some(*id))
            .count();

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Media deleted: {}",
        media.file_name
    )));
    if references > 0 {
        result.add_message(CmdMessage::warning(format!(
            "Still referenced by {} articles or albums",
            references
        )));
    }
    result.affected.push(media);
    Ok(result)
}

pub fn restore<S: DataStore>(store: &mut S, id: &Uuid) -> Result<CmdResult<Media>> {
    let media: Media = store.restore(id)?;
    Ok(CmdResult::default()
        .with_message(CmdMessage::success(format!(
            "Media restored: {}",
            media.file_name
        )))
        .with_affected(vec![media]))
}

pub fn list<S: DataStore>(store: &S, query: &ListQuery) -> Result<CmdResult<Media>> {
    let media: Vec<Media> = store.list()?;
    Ok(CmdResult::default().with_listed(query::run(&media, query)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::model::Album;
    use crate::query::{AttrFilter, SortMode};
    use crate::store::memory::InMemoryStore;

    fn new_media(file_name: &str) -> NewMedia {
        NewMedia {
            file_name: file_name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn mime_is_guessed() {
        assert_eq!(guess_mime("photo.JPG"), Some("image/jpeg"));
        assert_eq!(guess_mime("clip.webm"), Some("video/webm"));
        assert_eq!(guess_mime("notes"), None);
        assert_eq!(guess_mime("archive.tar.gz"), None);
    }

    #[test]
    fn register_rejects_duplicates() {
        let mut store = InMemoryStore::new();
        let media = register(&mut store, new_media("a.png")).unwrap().affected.remove(0);
        assert_eq!(media.mime_type.as_deref(), Some("image/png"));
        assert!(register(&mut store, new_media("a.png")).is_err());
        assert!(register(&mut store, new_media("  ")).is_err());
    }

    #[test]
    fn update_sets_title_and_alt() {
        let mut store = InMemoryStore::new();
        let media = register(&mut store, new_media("a.png")).unwrap().affected.remove(0);
        let changes = MediaUpdate {
            title: Some(" Sunset ".into()),
            alt: Some("Orange sky".into()),
            ..Default::default()
        };
        let updated = update(&mut store, &media.id, changes).unwrap().affected.remove(0);
        assert_eq!(updated.title, "Sunset");
        assert_eq!(updated.alt, "Orange sky");
    }

    #[test]
    fn delete_warns_about_references() {
        let mut store = InMemoryStore::new();
        let media = register(&mut store, new_media("a.png")).unwrap().affected.remove(0);
        let mut album = Album::new("Trip".into(), "trip".into());
        album.media_ids.push(media.id);
        store.save(&album).unwrap();

        let result = delete(&mut store, &media.id).unwrap();
        assert!(result
            .messages
            .iter()
            .any(|m| m.level == MessageLevel::Warning));
        assert!(list(&store, &ListQuery::default()).unwrap().listed.unwrap().is_empty());

        restore(&mut store, &media.id).unwrap();
        assert!(!list(&store, &ListQuery::default()).unwrap().listed.unwrap().is_empty());
    }

    #[test]
    fn list_filters_by_mime_and_sorts_by_label() {
        let mut store = InMemoryStore::new();
        for name in ["b.png", "a.png", "c.mp4"] {
            register(&mut store, new_media(name)).unwrap();
        }
        let query = ListQuery::new(SortMode::AzAsc, 10)
            .with_filter(AttrFilter::choice("mime", "image/png"));
        let page = list(&store, &query).unwrap().listed.unwrap();
        let names: Vec<&str> = page.items.iter().map(|m| m.file_name.as_str()).collect();
        assert_eq!(names, ["a.png", "b.png"]);
    }
}
