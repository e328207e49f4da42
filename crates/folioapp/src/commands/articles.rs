//! Article commands.
//!
//! Status rules applied on every save:
//!
//! - `published`: `published_at` is stamped (kept if already set), any
//!   schedule is cleared.
//! - `scheduled`: a future `scheduled_at` is required when the article is
//!   scheduled or its time changes. [`publish_due`] later promotes the
//!   article once that time has passed.
//! - `draft`: both timestamps are cleared.
//!
//! Tag usage counters follow the article's tag set: create and restore count
//! every tag, delete uncounts them, update applies the difference.
//!
//! Updates only validate references that change. A category or cover
//! deleted after the article was saved does not block later edits.

use super::helpers::{diff_ids, require_category, require_tags, require_text, resolve_slug};
use super::{CmdMessage, CmdResult, ContentOptions};
use crate::error::{FolioError, Result};
use crate::model::{Article, ArticleStatus, Media, Seo, Tag};
use crate::query::{self, ListQuery};
use crate::store::DataStore;
use crate::text::{excerpt, reading_time, slugify};
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct NewArticle {
    pub title: String,
    pub content: String,
    pub slug: Option<String>,
    /// Generated from the content when absent.
    pub excerpt: Option<String>,
    pub cover_media_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub tag_ids: Vec<Uuid>,
    pub status: ArticleStatus,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub featured: bool,
    pub seo: Seo,
}

/// Partial update. `None` leaves a field as is; for nullable fields
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct ArticleUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<Option<String>>,
    pub cover_media_id: Option<Option<Uuid>>,
    pub category_id: Option<Option<Uuid>>,
    pub tag_ids: Option<Vec<Uuid>>,
    pub status: Option<ArticleStatus>,
    pub scheduled_at: Option<Option<DateTime<Utc>>>,
    pub featured: Option<bool>,
    pub seo: Option<Seo>,
}

fn taken_slugs<S: DataStore>(store: &S, except: Option<Uuid>) -> Result<Vec<String>> {
    let articles: Vec<Article> = store.list()?;
    Ok(articles
        .into_iter()
        .filter(|a| Some(a.id) != except)
        .map(|a| a.slug)
        .collect())
}

/// Checks the references that differ from `before` (all of them for a new
/// article).
fn check_refs<S: DataStore>(
    store: &S,
    article: &mut Article,
    before: Option<&Article>,
) -> Result<()> {
    let kept_category = before.and_then(|b| b.category_id);
    if let Some(category_id) = article.category_id.filter(|id| Some(*id) != kept_category) {
        require_category(store, &category_id, true)?;
    }
    let kept_cover = before.and_then(|b| b.cover_media_id);
    if let Some(media_id) = article.cover_media_id.filter(|id| Some(*id) != kept_cover) {
        store.get::<Media>(&media_id)?;
    }
    let kept_tags = before.map(|b| b.tag_ids.as_slice()).unwrap_or(&[]);
    article.tag_ids = require_tags(store, &article.tag_ids, kept_tags)?;
    Ok(())
}

fn schedule_changed(article: &Article, before: Option<&Article>) -> bool {
    match before {
        None => true,
        Some(b) => b.status != ArticleStatus::Scheduled || b.scheduled_at != article.scheduled_at,
    }
}

fn apply_status(article: &mut Article, before: Option<&Article>, now: DateTime<Utc>) -> Result<()> {
    match article.status {
        ArticleStatus::Draft => {
            article.published_at = None;
            article.scheduled_at = None;
        }
        ArticleStatus::Published => {
            article.published_at.get_or_insert(now);
            article.scheduled_at = None;
        }
        ArticleStatus::Scheduled => match article.scheduled_at {
            None => {
                return Err(FolioError::validation(
                    "Scheduled articles need a publish time",
                ))
            }
            Some(at) if at <= now && schedule_changed(article, before) => {
                return Err(FolioError::validation(format!(
                    "Scheduled time {} is not in the future",
                    at.to_rfc3339()
                )))
            }
            Some(_) => article.published_at = None,
        },
    }
    Ok(())
}

fn auto_excerpt(content: &str, options: &ContentOptions) -> Option<String> {
    let text = excerpt(content, options.excerpt_length);
    (!text.is_empty()).then_some(text)
}

pub fn create<S: DataStore>(
    store: &mut S,
    input: NewArticle,
    options: &ContentOptions,
    now: DateTime<Utc>,
) -> Result<CmdResult<Article>> {
    let title = require_text(&input.title, "Title")?;
    let slug = resolve_slug(input.slug.as_deref(), &title, &taken_slugs(store, None)?)?;

    let mut article = Article::new(title, slug, input.content);
    article.excerpt = input
        .excerpt
        .filter(|e| !e.trim().is_empty())
        .or_else(|| auto_excerpt(&article.content, options));
    article.reading_time = reading_time(&article.content, options.words_per_minute);
    article.cover_media_id = input.cover_media_id;
    article.category_id = input.category_id;
    article.tag_ids = input.tag_ids;
    article.status = input.status;
    article.scheduled_at = input.scheduled_at;
    article.featured = input.featured;
    article.seo = input.seo;
    article.created_at = now;
    article.updated_at = now;

    check_refs(store, &mut article, None)?;
    apply_status(&mut article, None, now)?;

    store.save(&article)?;
    store.adjust_tag_usage(&article.tag_ids, &[])?;
    tracing::info!(
        id = %article.id,
        slug = %article.slug,
        status = %article.status,
        "article created"
    );

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Article created: {}",
        article.title
    )));
    result.affected.push(article);
    Ok(result)
}

pub fn update<S: DataStore>(
    store: &mut S,
    id: &Uuid,
    changes: ArticleUpdate,
    options: &ContentOptions,
    now: DateTime<Utc>,
) -> Result<CmdResult<Article>> {
    let before: Article = store.get(id)?;
    let mut article = before.clone();

    if let Some(title) = changes.title {
        article.title = require_text(&title, "Title")?;
    }
    if let Some(slug) = changes.slug.filter(|s| slugify(s) != article.slug) {
        let taken = taken_slugs(store, Some(*id))?;
        article.slug = resolve_slug(Some(&slug), &article.title, &taken)?;
    }
    if let Some(content) = changes.content {
        let excerpt_was_generated =
            before.excerpt == auto_excerpt(&before.content, options);
        article.content = content;
        article.reading_time = reading_time(&article.content, options.words_per_minute);
        if excerpt_was_generated && changes.excerpt.is_none() {
            article.excerpt = auto_excerpt(&article.content, options);
        }
    }
    if let Some(excerpt) = changes.excerpt {
        article.excerpt = excerpt.filter(|e| !e.trim().is_empty());
    }
    if let Some(cover) = changes.cover_media_id {
        article.cover_media_id = cover;
    }
    if let Some(category) = changes.category_id {
        article.category_id = category;
    }
    if let Some(tag_ids) = changes.tag_ids {
        article.tag_ids = tag_ids;
    }
    if let Some(scheduled_at) = changes.scheduled_at {
        article.scheduled_at = scheduled_at;
    }
    if let Some(status) = changes.status {
        article.status = status;
    }
    if let Some(featured) = changes.featured {
        article.featured = featured;
    }
    if let Some(seo) = changes.seo {
        article.seo = seo;
    }

    check_refs(store, &mut article, Some(&before))?;
    apply_status(&mut article, Some(&before), now)?;
    article.updated_at = now;

    store.save(&article)?;
    let (added, removed) = diff_ids(&before.tag_ids, &article.tag_ids);
    store.adjust_tag_usage(&added, &removed)?;
    tracing::info!(
        id = %article.id,
        tags_added = added.len(),
        tags_removed = removed.len(),
        "article updated"
    );

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Article updated: {}",
        article.title
    )));
    result.affected.push(article);
    Ok(result)
}

pub fn delete<S: DataStore>(store: &mut S, id: &Uuid) -> Result<CmdResult<Article>> {
    let article: Article = store.soft_delete(id)?;
    store.adjust_tag_usage(&[], &article.tag_ids)?;
    tracing::info!(id = %article.id, "article deleted");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Article deleted: {}",
        article.title
    )));
    result.affected.push(article);
    Ok(result)
}

/// Brings a deleted article back. If a live article took its slug in the
/// meantime, the restored one gets a suffixed slug. Tags deleted in the
/// meantime are dropped from the article.
pub fn restore<S: DataStore>(store: &mut S, id: &Uuid) -> Result<CmdResult<Article>> {
    let mut article: Article = store.restore(id)?;
    let mut result = CmdResult::default();
    let mut changed = false;

    let taken = taken_slugs(store, Some(article.id))?;
    if taken.contains(&article.slug) {
        let fresh = resolve_slug(None, &article.slug, &taken)?;
        result.add_message(CmdMessage::warning(format!(
            "Slug {} is in use, restored as {}",
            article.slug, fresh
        )));
        article.slug = fresh;
        changed = true;
    }

    let live: Vec<Tag> = store.list()?;
    let before = article.tag_ids.len();
    article.tag_ids.retain(|id| live.iter().any(|t| t.id == *id));
    let dropped = before - article.tag_ids.len();
    if dropped > 0 {
        result.add_message(CmdMessage::warning(format!(
            "{} deleted tags removed from the article",
            dropped
        )));
        changed = true;
    }

    if changed {
        store.save(&article)?;
    }

    store.adjust_tag_usage(&article.tag_ids, &[])?;
    tracing::info!(id = %article.id, "article restored");

    result.add_message(CmdMessage::success(format!(
        "Article restored: {}",
        article.title
    )));
    result.affected.push(article);
    Ok(result)
}

pub fn get<S: DataStore>(store: &S, id: &Uuid) -> Result<Article> {
    store.get(id)
}

pub fn find_by_slug<S: DataStore>(store: &S, slug: &str) -> Result<Option<Article>> {
    let articles: Vec<Article> = store.list()?;
    Ok(articles.into_iter().find(|a| a.slug == slug))
}

/// One page of live articles.
pub fn list<S: DataStore>(store: &S, query: &ListQuery) -> Result<CmdResult<Article>> {
    let articles: Vec<Article> = store.list()?;
    Ok(CmdResult::default().with_listed(query::run(&articles, query)))
}

/// One page of deleted articles.
pub fn list_deleted<S: DataStore>(store: &S, query: &ListQuery) -> Result<CmdResult<Article>> {
    let articles: Vec<Article> = store.list_deleted()?;
    Ok(CmdResult::default().with_listed(query::run(&articles, query)))
}

/// Publishes every scheduled article whose time has come.
pub fn publish_due<S: DataStore>(store: &mut S, now: DateTime<Utc>) -> Result<CmdResult<Article>> {
    let articles: Vec<Article> = store.list()?;
    let due: Vec<Article> = articles
        .into_iter()
        .filter(|a| a.status == ArticleStatus::Scheduled)
        .filter(|a| a.scheduled_at.map(|at| at <= now).unwrap_or(false))
        .map(|mut a| {
            a.status = ArticleStatus::Published;
            a.published_at = a.scheduled_at.take();
            a.updated_at = now;
            a
        })
        .collect();

    store.save_many(&due)?;

    let mut result = CmdResult::default();
    if due.is_empty() {
        result.add_message(CmdMessage::info("No scheduled articles are due"));
    } else {
        tracing::info!(count = due.len(), "scheduled articles published");
        for article in &due {
            result.add_message(CmdMessage::success(format!(
                "Article published: {}",
                article.title
            )));
        }
    }
    Ok(result.with_affected(due))
}

/// Published articles visible at `now`, run through `query`.
pub fn public_feed<S: DataStore>(
    store: &S,
    query: &ListQuery,
    now: DateTime<Utc>,
) -> Result<CmdResult<Article>> {
    let articles: Vec<Article> = store.list()?;
    let public: Vec<Article> = articles.into_iter().filter(|a| a.is_public(now)).collect();
    Ok(CmdResult::default().with_listed(query::run(&public, query)))
}
