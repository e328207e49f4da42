//! Album commands.
//!
//! An album's gallery is its `media_ids` list, in display order. Every entry
//! must be live media and appear once. The cover defaults to the first
//! gallery item and follows it when the current cover is removed.

use super::helpers::{require_category, require_media, require_text, resolve_slug};
use super::{CmdMessage, CmdResult};
use crate::error::{FolioError, Result};
use crate::model::{Album, AlbumStatus, Media};
use crate::query::{self, ListQuery};
use crate::store::DataStore;
use crate::text::slugify;
use chrono::Utc;
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct NewAlbum {
    pub title: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub cover_media_id: Option<Uuid>,
    pub media_ids: Vec<Uuid>,
    pub category_id: Option<Uuid>,
    pub tags: Vec<String>,
    pub status: AlbumStatus,
}

#[derive(Debug, Clone, Default)]
pub struct AlbumUpdate {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<Option<String>>,
    pub cover_media_id: Option<Option<Uuid>>,
    pub category_id: Option<Option<Uuid>>,
    pub tags: Option<Vec<String>>,
    pub status: Option<AlbumStatus>,
}

/// Trims tag names and drops blanks and case-insensitive duplicates.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            out.push(tag.to_string());
        }
    }
    out
}

fn taken_slugs<S: DataStore>(store: &S, except: Option<Uuid>) -> Result<Vec<String>> {
    let albums: Vec<Album> = store.list()?;
    Ok(albums
        .into_iter()
        .filter(|a| Some(a.id) != except)
        .map(|a| a.slug)
        .collect())
}

/// Checks the references that differ from `before`, so media or a category
/// deleted after the album was saved does not block later edits.
fn check_refs<S: DataStore>(store: &S, album: &mut Album, before: Option<&Album>) -> Result<()> {
    let kept_category = before.and_then(|b| b.category_id);
    if let Some(category_id) = album.category_id.filter(|id| Some(*id) != kept_category) {
        require_category(store, &category_id, false)?;
    }
    let kept_media = before.map(|b| b.media_ids.as_slice()).unwrap_or(&[]);
    require_media(store, &album.media_ids, kept_media)?;
    let kept_cover = before.and_then(|b| b.cover_media_id);
    match album.cover_media_id {
        Some(cover) if Some(cover) != kept_cover => {
            store.get::<Media>(&cover)?;
        }
        Some(_) => {}
        None => album.cover_media_id = album.media_ids.first().copied(),
    }
    Ok(())
}

fn saved<S: DataStore>(store: &mut S, album: Album, message: String) -> Result<CmdResult<Album>> {
    store.save(&album)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(message));
    result.affected.push(album);
    Ok(result)
}

pub fn create<S: DataStore>(store: &mut S, input: NewAlbum) -> Result<CmdResult<Album>> {
    let title = require_text(&input.title, "Title")?;
    let slug = resolve_slug(input.slug.as_deref(), &title, &taken_slugs(store, None)?)?;

    let mut album = Album::new(title, slug);
    album.description = input.description.filter(|d| !d.trim().is_empty());
    album.cover_media_id = input.cover_media_id;
    album.media_ids = input.media_ids;
    album.category_id = input.category_id;
    album.tags = normalize_tags(input.tags);
    album.status = input.status;
    check_refs(store, &mut album, None)?;

    tracing::info!(id = %album.id, media = album.media_ids.len(), "album created");
    let message = format!("Album created: {}", album.title);
    saved(store, album, message)
}

pub fn update<S: DataStore>(
    store: &mut S,
    id: &Uuid,
    changes: AlbumUpdate,
) -> Result<CmdResult<Album>> {
    let before: Album = store.get(id)?;
    let mut album = before.clone();

    if let Some(title) = changes.title {
        album.title = require_text(&title, "Title")?;
    }
    if let Some(slug) = changes.slug.filter(|s| slugify(s) != album.slug) {
        let taken = taken_slugs(store, Some(*id))?;
        album.slug = resolve_slug(Some(&slug), &album.title, &taken)?;
    }
    if let Some(description) = changes.description {
        album.description = description.filter(|d| !d.trim().is_empty());
    }
    if let Some(cover) = changes.cover_media_id {
        album.cover_media_id = cover;
    }
    if let Some(category) = changes.category_id {
        album.category_id = category;
    }
    if let Some(tags) = changes.tags {
        album.tags = normalize_tags(tags);
    }
    if let Some(status) = changes.status {
        album.status = status;
    }
    check_refs(store, &mut album, Some(&before))?;
    album.updated_at = Utc::now();

    tracing::info!(id = %album.id, "album updated");
    let message = format!("Album updated: {}", album.title);
    saved(store, album, message)
}

pub fn delete<S: DataStore>(store: &mut S, id: &Uuid) -> Result<CmdResult<Album>> {
    let album: Album = store.soft_delete(id)?;
    tracing::info!(id = %album.id, "album deleted");
    Ok(CmdResult::default()
        .with_message(CmdMessage::success(format!("Album deleted: {}", album.title)))
        .with_affected(vec![album]))
}

pub fn restore<S: DataStore>(store: &mut S, id: &Uuid) -> Result<CmdResult<Album>> {
    let album: Album = store.restore(id)?;
    tracing::info!(id = %album.id, "album restored");
    Ok(CmdResult::default()
        .with_message(CmdMessage::success(format!("Album restored: {}", album.title)))
        .with_affected(vec![album]))
}

pub fn list<S: DataStore>(store: &S, query: &ListQuery) -> Result<CmdResult<Album>> {
    let albums: Vec<Album> = store.list()?;
    Ok(CmdResult::default().with_listed(query::run(&albums, query)))
}

/// Appends media to the gallery. Items already in it are skipped.
pub fn add_media<S: DataStore>(
    store: &mut S,
    id: &Uuid,
    media_ids: &[Uuid],
) -> Result<CmdResult<Album>> {
    let before: Album = store.get(id)?;
    let mut album = before.clone();
    let mut added = 0;
    for media_id in media_ids {
        if !album.media_ids.contains(media_id) {
            album.media_ids.push(*media_id);
            added += 1;
        }
    }
    check_refs(store, &mut album, Some(&before))?;
    album.updated_at = Utc::now();

    let message = format!("Added {} items to {}", added, album.title);
    saved(store, album, message)
}

/// Removes media from the gallery. A removed cover is replaced by the new
/// first item.
pub fn remove_media<S: DataStore>(
    store: &mut S,
    id: &Uuid,
    media_ids: &[Uuid],
) -> Result<CmdResult<Album>> {
    let mut album: Album = store.get(id)?;
    let before = album.media_ids.len();
    album.media_ids.retain(|m| !media_ids.contains(m));
    let removed = before - album.media_ids.len();

    if album
        .cover_media_id
        .map(|cover| media_ids.contains(&cover))
        .unwrap_or(false)
    {
        album.cover_media_id = album.media_ids.first().copied();
    }
    album.updated_at = Utc::now();

    let message = format!("Removed {} items from {}", removed, album.title);
    saved(store, album, message)
}

/// Sets the gallery order. `order` must be a permutation of the current
/// gallery.
pub fn reorder_media<S: DataStore>(
    store: &mut S,
    id: &Uuid,
    order: &[Uuid],
) -> Result<CmdResult<Album>> {
    let mut album: Album = store.get(id)?;

    let mut expected = album.media_ids.clone();
    let mut given = order.to_vec();
    expected.sort();
    given.sort();
    if expected != given {
        return Err(FolioError::validation(
            "New order must list every gallery item exactly once",
        ));
    }

    album.media_ids = order.to_vec();
    album.updated_at = Utc::now();
    let message = format!("Reordered {}", album.title);
    saved(store, album, message)
}
