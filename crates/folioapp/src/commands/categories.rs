//! Category commands.
//!
//! Categories form a forest through `parent_id`. A parent must be a live
//! category and may not be the category itself or one of its descendants,
//! so the forest never contains a cycle. A category with live children
//! cannot be deleted.

use super::helpers::{next_order, reorder_by, require_text, resolve_slug};
use super::{CmdMessage, CmdResult};
use crate::error::{FolioError, Result};
use crate::model::{Album, Article, Category, CategoryKind};
use crate::query::{self, sort, ListQuery, SortMode};
use crate::store::DataStore;
use crate::text::slugify;
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct NewCategory {
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub kind: CategoryKind,
    pub parent_id: Option<Uuid>,
    /// Appended after the last category when absent.
    pub order: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<Option<String>>,
    pub kind: Option<CategoryKind>,
    pub parent_id: Option<Option<Uuid>>,
    pub order: Option<i64>,
}

/// A category with its children, recursively.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryNode {
    #[serde(flatten)]
    pub category: Category,
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    /// Number of categories in this subtree, the node itself included.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(CategoryNode::size).sum::<usize>()
    }
}

fn taken_slugs(categories: &[Category], except: Option<Uuid>) -> Vec<String> {
    categories
        .iter()
        .filter(|c| Some(c.id) != except)
        .map(|c| c.slug.clone())
        .collect()
}

/// Rejects a parent that is missing, deleted, `id` itself, or below `id`.
fn check_parent(categories: &[Category], id: Option<Uuid>, parent_id: Uuid) -> Result<()> {
    if Some(parent_id) == id {
        return Err(FolioError::validation("A category cannot be its own parent"));
    }

    let mut cursor = Some(parent_id);
    let mut steps = 0;
    while let Some(current) = cursor {
        let node = categories
            .iter()
            .find(|c| c.id == current)
            .ok_or(FolioError::NotFound {
                kind: "Category",
                id: current,
            })?;
        if Some(node.id) == id {
            return Err(FolioError::validation(
                "A category cannot be moved under one of its descendants",
            ));
        }
        cursor = node.parent_id;
        steps += 1;
        // Stored data with a cycle would otherwise loop forever.
        if steps > categories.len() {
            return Err(FolioError::Store("Category hierarchy contains a cycle".into()));
        }
    }
    Ok(())
}

/// Number of ancestors of `id` found in `categories`. A cycle stops the walk.
pub fn depth(categories: &[Category], id: &Uuid) -> usize {
    let mut depth = 0;
    let mut cursor = categories.iter().find(|c| c.id == *id).and_then(|c| c.parent_id);
    while let Some(parent_id) = cursor {
        if depth >= categories.len() {
            break;
        }
        depth += 1;
        cursor = categories
            .iter()
            .find(|c| c.id == parent_id)
            .and_then(|c| c.parent_id);
    }
    depth
}

pub fn create<S: DataStore>(store: &mut S, input: NewCategory) -> Result<CmdResult<Category>> {
    let categories: Vec<Category> = store.list()?;
    let name = require_text(&input.name, "Name")?;
    let slug = resolve_slug(input.slug.as_deref(), &name, &taken_slugs(&categories, None))?;

    if let Some(parent_id) = input.parent_id {
        check_parent(&categories, None, parent_id)?;
    }

    let mut category = Category::new(name, slug, input.kind);
    category.description = input.description.filter(|d| !d.trim().is_empty());
    category.parent_id = input.parent_id;
    category.order = input
        .order
        .unwrap_or_else(|| next_order(categories.iter().map(|c| c.order)));

    store.save(&category)?;
    tracing::info!(id = %category.id, slug = %category.slug, "category created");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Category created: {}",
        category.name
    )));
    result.affected.push(category);
    Ok(result)
}

pub fn update<S: DataStore>(
    store: &mut S,
    id: &Uuid,
    changes: CategoryUpdate,
) -> Result<CmdResult<Category>> {
    let categories: Vec<Category> = store.list()?;
    let mut category: Category = store.get(id)?;

    if let Some(name) = changes.name {
        category.name = require_text(&name, "Name")?;
    }
    if let Some(slug) = changes.slug.filter(|s| slugify(s) != category.slug) {
        let taken = taken_slugs(&categories, Some(*id));
        category.slug = resolve_slug(Some(&slug), &category.name, &taken)?;
    }
    if let Some(description) = changes.description {
        category.description = description.filter(|d| !d.trim().is_empty());
    }
    if let Some(parent_id) = changes.parent_id {
        if let Some(parent) = parent_id {
            check_parent(&categories, Some(*id), parent)?;
        }
        category.parent_id = parent_id;
    }
    if let Some(order) = changes.order {
        category.order = order;
    }
    if let Some(kind) = changes.kind {
        check_kind_change(store, &category, kind)?;
        category.kind = kind;
    }
    category.updated_at = Utc::now();

    store.save(&category)?;
    tracing::info!(id = %category.id, "category updated");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Category updated: {}",
        category.name
    )));
    result.affected.push(category);
    Ok(result)
}

/// A category cannot stop accepting a content type that still uses it.
fn check_kind_change<S: DataStore>(
    store: &S,
    category: &Category,
    kind: CategoryKind,
) -> Result<()> {
    if !kind.accepts_articles() {
        let articles: Vec<Article> = store.list()?;
        let used = articles
            .iter()
            .filter(|a| a.category_id == Some(category.id))
            .count();
        if used > 0 {
            return Err(FolioError::validation(format!(
                "Category \"{}\" still holds {} articles",
                category.name, used
            )));
        }
    }
    if !kind.accepts_albums() {
        let albums: Vec<Album> = store.list()?;
        let used = albums
            .iter()
            .filter(|a| a.category_id == Some(category.id))
            .count();
        if used > 0 {
            return Err(FolioError::validation(format!(
                "Category \"{}\" still holds {} albums",
                category.name, used
            )));
        }
    }
    Ok(())
}

pub fn delete<S: DataStore>(store: &mut S, id: &Uuid) -> Result<CmdResult<Category>> {
    let categories: Vec<Category> = store.list()?;
    let children = categories
        .iter()
        .filter(|c| c.parent_id == Some(*id))
        .count();
    if children > 0 {
        return Err(FolioError::HasChildren {
            id: *id,
            count: children,
        });
    }

    let category: Category = store.soft_delete(id)?;
    tracing::info!(id = %category.id, "category deleted");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Category deleted: {}",
        category.name
    )));

    let articles: Vec<Article> = store.list()?;
    let orphaned = articles
        .iter()
        .filter(|a| a.category_id == Some(*id))
        .count();
    if orphaned > 0 {
        result.add_message(CmdMessage::warning(format!(
            "{} articles still reference this category",
            orphaned
        )));
    }

    result.affected.push(category);
    Ok(result)
}

pub fn restore<S: DataStore>(store: &mut S, id: &Uuid) -> Result<CmdResult<Category>> {
    let mut category: Category = store.restore(id)?;
    let mut result = CmdResult::default();

    if let Some(parent_id) = category.parent_id {
        if store.get::<Category>(&parent_id).is_err() {
            category.parent_id = None;
            store.save(&category)?;
            result.add_message(CmdMessage::warning(
                "Parent category is gone, restored at the top level",
            ));
        }
    }

    result.add_message(CmdMessage::success(format!(
        "Category restored: {}",
        category.name
    )));
    result.affected.push(category);
    Ok(result)
}

pub fn list<S: DataStore>(store: &S, query: &ListQuery) -> Result<CmdResult<Category>> {
    let categories: Vec<Category> = store.list()?;
    Ok(CmdResult::default().with_listed(query::run(&categories, query)))
}

/// Sets the manual order: `ids` first, in that sequence, then the rest.
pub fn reorder<S: DataStore>(store: &mut S, ids: &[Uuid]) -> Result<CmdResult<Category>> {
    let categories: Vec<Category> = store.list()?;
    let current = sort::sorted(&categories, SortMode::OrderAsc);
    let changed = reorder_by(current, ids, |c| c.id, |c| &mut c.order)?;
    store.save_many(&changed)?;

    Ok(CmdResult::default()
        .with_message(CmdMessage::success(format!(
            "Reordered {} categories",
            changed.len()
        )))
        .with_affected(changed))
}

/// Live categories as a forest, siblings in manual order.
///
/// With `kind`, only categories accepting that content type are included;
/// a child whose parent is excluded (or gone) becomes a root.
pub fn tree<S: DataStore>(store: &S, kind: Option<CategoryKind>) -> Result<Vec<CategoryNode>> {
    let categories: Vec<Category> = store.list()?;
    let included: Vec<Category> = categories
        .into_iter()
        .filter(|c| match kind {
            Some(CategoryKind::Article) => c.kind.accepts_articles(),
            Some(CategoryKind::Album) => c.kind.accepts_albums(),
            Some(CategoryKind::Both) | None => true,
        })
        .collect();
    let ordered = sort::sorted(&included, SortMode::OrderAsc);

    let is_root = |c: &Category| match c.parent_id {
        None => true,
        Some(parent) => !ordered.iter().any(|p| p.id == parent),
    };

    Ok(ordered
        .iter()
        .filter(|c| is_root(c))
        .map(|root| build_node(root, &ordered, 0))
        .collect())
}

fn build_node(category: &Category, all: &[Category], depth: usize) -> CategoryNode {
    let children = if depth >= all.len() {
        Vec::new()
    } else {
        all.iter()
            .filter(|c| c.parent_id == Some(category.id))
            .map(|child| build_node(child, all, depth + 1))
            .collect()
    };
    CategoryNode {
        category: category.clone(),
        children,
    }
}
