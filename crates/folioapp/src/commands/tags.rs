//! Tag registry commands.
//!
//! A tag's `usage_count` is owned by the article commands; nothing here
//! changes it except [`recount`], which rebuilds every count from the live
//! articles.

use super::helpers::{require_text, resolve_slug};
use super::{CmdMessage, CmdResult};
use crate::error::{FolioError, Result};
use crate::model::{Article, Tag};
use crate::query::{self, ListQuery};
use crate::store::DataStore;
use std::collections::HashMap;
use uuid::Uuid;

fn check_name_free(tags: &[Tag], name: &str, except: Option<Uuid>) -> Result<()> {
    if tags
        .iter()
        .any(|t| Some(t.id) != except && t.name.eq_ignore_ascii_case(name))
    {
        return Err(FolioError::validation(format!("Tag already exists: {}", name)));
    }
    Ok(())
}

fn slugs(tags: &[Tag], except: Option<Uuid>) -> Vec<String> {
    tags.iter()
        .filter(|t| Some(t.id) != except)
        .map(|t| t.slug.clone())
        .collect()
}

pub fn create<S: DataStore>(
    store: &mut S,
    name: &str,
    slug: Option<&str>,
) -> Result<CmdResult<Tag>> {
    let tags: Vec<Tag> = store.list()?;
    let name = require_text(name, "Tag name")?;
    check_name_free(&tags, &name, None)?;
    let slug = resolve_slug(slug, &name, &slugs(&tags, None))?;

    let tag = Tag::new(name, slug);
    store.save(&tag)?;
    tracing::info!(id = %tag.id, name = %tag.name, "tag created");

    Ok(CmdResult::default()
        .with_message(CmdMessage::success(format!("Tag created: {}", tag.name)))
        .with_affected(vec![tag]))
}

/// Returns tags for `names`, creating the missing ones. Matching is
/// case-insensitive; the result follows the order of `names`.
pub fn ensure<S: DataStore>(store: &mut S, names: &[String]) -> Result<CmdResult<Tag>> {
    let mut result = CmdResult::default();
    for name in names {
        let tags: Vec<Tag> = store.list()?;
        let wanted = name.trim();
        match tags.into_iter().find(|t| t.name.eq_ignore_ascii_case(wanted)) {
            Some(tag) => {
                if !result.affected.iter().any(|t: &Tag| t.id == tag.id) {
                    result.affected.push(tag);
                }
            }
            None => {
                let created = create(store, wanted, None)?;
                result.messages.extend(created.messages);
                result.affected.extend(created.affected);
            }
        }
    }
    Ok(result)
}

/// Renames a tag and re-derives its slug from the new name.
pub fn rename<S: DataStore>(store: &mut S, id: &Uuid, name: &str) -> Result<CmdResult<Tag>> {
    let tags: Vec<Tag> = store.list()?;
    let mut tag: Tag = store.get(id)?;
    let name = require_text(name, "Tag name")?;
    check_name_free(&tags, &name, Some(*id))?;

    let old = std::mem::replace(&mut tag.name, name);
    tag.slug = resolve_slug(None, &tag.name, &slugs(&tags, Some(*id)))?;
    store.save(&tag)?;
    tracing::info!(id = %tag.id, from = %old, to = %tag.name, "tag renamed");

    Ok(CmdResult::default()
        .with_message(CmdMessage::success(format!(
            "Tag renamed: {} -> {}",
            old, tag.name
        )))
        .with_affected(vec![tag]))
}

/// Deletes an unused tag. Tags still on live articles are refused.
pub fn delete<S: DataStore>(store: &mut S, id: &Uuid) -> Result<CmdResult<Tag>> {
    let tag: Tag = store.get(id)?;
    if tag.usage_count > 0 {
        return Err(FolioError::TagInUse {
            name: tag.name,
            count: tag.usage_count,
        });
    }
    let tag: Tag = store.soft_delete(id)?;
    tracing::info!(id = %tag.id, "tag deleted");

    Ok(CmdResult::default()
        .with_message(CmdMessage::success(format!("Tag deleted: {}", tag.name)))
        .with_affected(vec![tag]))
}

pub fn restore<S: DataStore>(store: &mut S, id: &Uuid) -> Result<CmdResult<Tag>> {
    let tag: Tag = store.restore(id)?;
    Ok(CmdResult::default()
        .with_message(CmdMessage::success(format!("Tag restored: {}", tag.name)))
        .with_affected(vec![tag]))
}

pub fn list<S: DataStore>(store: &S, query: &ListQuery) -> Result<CmdResult<Tag>> {
    let tags: Vec<Tag> = store.list()?;
    Ok(CmdResult::default().with_listed(query::run(&tags, query)))
}

/// Rebuilds every usage count from the live articles. Returns the tags whose
/// count was wrong.
pub fn recount<S: DataStore>(store: &mut S) -> Result<CmdResult<Tag>> {
    let articles: Vec<Article> = store.list()?;
    let mut counts: HashMap<Uuid, u32> = HashMap::new();
    for article in &articles {
        for tag_id in &article.tag_ids {
            *counts.entry(*tag_id).or_default() += 1;
        }
    }

    let tags: Vec<Tag> = store.list()?;
    let fixed: Vec<Tag> = tags
        .into_iter()
        .filter_map(|mut tag| {
            let actual = counts.get(&tag.id).copied().unwrap_or(0);
            (tag.usage_count != actual).then(|| {
                tag.usage_count = actual;
                tag
            })
        })
        .collect();
    store.save_many(&fixed)?;

    let mut result = CmdResult::default();
    if fixed.is_empty() {
        result.add_message(CmdMessage::info("All tag counts are correct"));
    } else {
        tracing::warn!(count = fixed.len(), "tag usage counts repaired");
        result.add_message(CmdMessage::warning(format!(
            "Repaired usage count of {} tags",
            fixed.len()
        )));
    }
    Ok(result.with_affected(fixed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::SortMode;
    use crate::store::memory::InMemoryStore;

    fn created(store: &mut InMemoryStore, name: &str) -> Tag {
        create(store, name, None).unwrap().affected.remove(0)
    }

    #[test]
    fn names_are_unique_case_insensitively() {
        let mut store = InMemoryStore::new();
        let tag = created(&mut store, "Rust");
        assert_eq!(tag.slug, "rust");
        assert_eq!(tag.usage_count, 0);
        assert!(create(&mut store, "rust", None).is_err());
        assert!(create(&mut store, "Other", Some("rust")).is_err());
    }

    #[test]
    fn ensure_creates_missing_only() {
        let mut store = InMemoryStore::new();
        let rust = created(&mut store, "rust");
        let result = ensure(
            &mut store,
            &["RUST".to_string(), "web".to_string(), "rust".to_string()],
        )
        .unwrap();
        assert_eq!(result.affected.len(), 2);
        assert_eq!(result.affected[0].id, rust.id);
        assert_eq!(result.affected[1].name, "web");
        assert_eq!(store.list::<Tag>().unwrap().len(), 2);
    }

    #[test]
    fn rename_rederives_slug() {
        let mut store = InMemoryStore::new();
        let tag = created(&mut store, "Rust Lang");
        created(&mut store, "Go");
        let renamed = rename(&mut store, &tag.id, "Rustacean Life").unwrap().affected.remove(0);
        assert_eq!(renamed.slug, "rustacean-life");
        assert!(rename(&mut store, &tag.id, "go").is_err());
    }

    #[test]
    fn delete_refused_while_in_use() {
        let mut store = InMemoryStore::new();
        let tag = created(&mut store, "busy");
        store.adjust_tag_usage(&[tag.id], &[]).unwrap();

        match delete(&mut store, &tag.id) {
            Err(FolioError::TagInUse { count, .. }) => assert_eq!(count, 1),
            other => panic!("Expected TagInUse, got {:?}", other),
        }

        store.adjust_tag_usage(&[], &[tag.id]).unwrap();
        assert!(delete(&mut store, &tag.id).is_ok());
        assert!(restore(&mut store, &tag.id).is_ok());
    }

    #[test]
    fn list_most_used_first() {
        let mut store = InMemoryStore::new();
        let rare = created(&mut store, "rare");
        let common = created(&mut store, "common");
        store.adjust_tag_usage(&[common.id, common.id, rare.id], &[]).unwrap();

        let page = list(&store, &ListQuery::new(SortMode::OrderDesc, 10))
            .unwrap()
            .listed
            .unwrap();
        let names: Vec<&str> = page.items.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["common", "rare"]);
    }

    #[test]
    fn recount_repairs_drift() {
        let mut store = InMemoryStore::new();
        let tag = created(&mut store, "drift");
        store.adjust_tag_usage(&[tag.id, tag.id], &[]).unwrap();

        let mut article = Article::new("A".into(), "a".into(), String::new());
        article.tag_ids = vec![tag.id];
        store.save(&article).unwrap();

        let result = recount(&mut store).unwrap();
        assert_eq!(result.affected.len(), 1);
        assert_eq!(store.get::<Tag>(&tag.id).unwrap().usage_count, 1);

        assert!(recount(&mut store).unwrap().affected.is_empty());
    }
}
