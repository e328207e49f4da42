//! Link hub commands.
//!
//! Links are ordered manually within their kind (`main` or `social`). The
//! public hub shows active links only.

use super::helpers::{next_order, reorder_by, require_text};
use super::{CmdMessage, CmdResult};
use crate::error::{FolioError, Result};
use crate::model::{Link, LinkKind};
use crate::query::{self, sort, ListQuery, SortMode};
use crate::store::DataStore;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct NewLink {
    pub title: String,
    pub url: String,
    pub kind: LinkKind,
    pub active: bool,
}

impl NewLink {
    pub fn new(title: impl Into<String>, url: impl Into<String>, kind: LinkKind) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            kind,
            active: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LinkUpdate {
    pub title: Option<String>,
    pub url: Option<String>,
    pub kind: Option<LinkKind>,
    pub active: Option<bool>,
}

/// Active links split by kind, each in manual order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LinkHub {
    pub main: Vec<Link>,
    pub social: Vec<Link>,
}

impl LinkHub {
    pub fn is_empty(&self) -> bool {
        self.main.is_empty() && self.social.is_empty()
    }
}

/// Accepts absolute http(s) and mailto URLs and site-relative paths.
pub fn validate_url(url: &str) -> Result<String> {
    let url = require_text(url, "URL")?;
    let lower = url.to_ascii_lowercase();
    let ok = match lower.split_once(':') {
        Some(("http", rest)) | Some(("https", rest)) => {
            rest.starts_with("//") && rest.len() > 2 && !rest.contains(char::is_whitespace)
        }
        Some(("mailto", rest)) => rest.contains('@'),
        _ => url.starts_with('/') && !url.starts_with("//"),
    };
    if !ok {
        return Err(FolioError::validation(format!("Invalid URL: {}", url)));
    }
    Ok(url)
}

fn next_order_for<S: DataStore>(store: &S, kind: LinkKind) -> Result<i64> {
    let links: Vec<Link> = store.list()?;
    Ok(next_order(
        links.iter().filter(|l| l.kind == kind).map(|l| l.order),
    ))
}

pub fn create<S: DataStore>(store: &mut S, input: NewLink) -> Result<CmdResult<Link>> {
    let title = require_text(&input.title, "Title")?;
    let url = validate_url(&input.url)?;

    let mut link = Link::new(title, url, input.kind);
    link.active = input.active;
    link.order = next_order_for(store, input.kind)?;
    store.save(&link)?;
    tracing::info!(id = %link.id, kind = %link.kind, "link created");

    Ok(CmdResult::default()
        .with_message(CmdMessage::success(format!("Link created: {}", link.title)))
        .with_affected(vec![link]))
}

/// Updates a link. Moving it to another kind appends it to that kind's order.
pub fn update<S: DataStore>(
    store: &mut S,
    id: &Uuid,
    changes: LinkUpdate,
) -> Result<CmdResult<Link>> {
    let mut link: Link = store.get(id)?;
    if let Some(title) = changes.title {
        link.title = require_text(&title, "Title")?;
    }
    if let Some(url) = changes.url {
        link.url = validate_url(&url)?;
    }
    if let Some(kind) = changes.kind.filter(|k| *k != link.kind) {
        link.order = next_order_for(store, kind)?;
        link.kind = kind;
    }
    if let Some(active) = changes.active {
        link.active = active;
    }
    store.save(&link)?;

    Ok(CmdResult::default()
        .with_message(CmdMessage::success(format!("Link updated: {}", link.title)))
        .with_affected(vec![link]))
}

pub fn toggle_active<S: DataStore>(store: &mut S, id: &Uuid) -> Result<CmdResult<Link>> {
    let mut link: Link = store.get(id)?;
    link.active = !link.active;
    store.save(&link)?;
    let state = if link.active { "enabled" } else { "disabled" };
    tracing::info!(id = %link.id, active = link.active, "link toggled");

    Ok(CmdResult::default()
        .with_message(CmdMessage::success(format!("Link {}: {}", state, link.title)))
        .with_affected(vec![link]))
}

/// Sets the manual order of `ids` within `kind`: they come first, in the given
/// sequence, followed by the remaining links of that kind.
pub fn reorder<S: DataStore>(
    store: &mut S,
    kind: LinkKind,
    ids: &[Uuid],
) -> Result<CmdResult<Link>> {
    let links: Vec<Link> = store.list()?;
    let of_kind: Vec<Link> = links.into_iter().filter(|l| l.kind == kind).collect();
    let current = sort::sorted(&of_kind, SortMode::OrderAsc);
    let changed = reorder_by(current, ids, |l| l.id, |l| &mut l.order)?;
    store.save_many(&changed)?;

    Ok(CmdResult::default()
        .with_message(CmdMessage::success(format!(
            "Reordered {} {} links",
            changed.len(),
            kind
        )))
        .with_affected(changed))
}

pub fn delete<S: DataStore>(store: &mut S, id: &Uuid) -> Result<CmdResult<Link>> {
    let link: Link = store.soft_delete(id)?;
    tracing::info!(id = %link.id, "link deleted");
    Ok(CmdResult::default()
        .with_message(CmdMessage::success(format!("Link deleted: {}", link.title)))
        .with_affected(vec![link]))
}

/// Restores a link at the end of its kind's order.
pub fn restore<S: DataStore>(store: &mut S, id: &Uuid) -> Result<CmdResult<Link>> {
    let mut link: Link = store.restore(id)?;
    let links: Vec<Link> = store.list()?;
    link.order = next_order(
        links
            .iter()
            .filter(|l| l.kind == link.kind && l.id != link.id)
            .map(|l| l.order),
    );
    store.save(&link)?;
    Ok(CmdResult::default()
        .with_message(CmdMessage::success(format!("Link restored: {}", link.title)))
        .with_affected(vec![link]))
}

pub fn list<S: DataStore>(store: &S, query: &ListQuery) -> Result<CmdResult<Link>> {
    let links: Vec<Link> = store.list()?;
    Ok(CmdResult::default().with_listed(query::run(&links, query)))
}

pub fn hub<S: DataStore>(store: &S) -> Result<LinkHub> {
    let links: Vec<Link> = store.list()?;
    let active: Vec<Link> = links.into_iter().filter(|l| l.active).collect();
    let (main, social): (Vec<Link>, Vec<Link>) = sort::sorted(&active, SortMode::OrderAsc)
        .into_iter()
        .partition(|l| l.kind == LinkKind::Main);
    Ok(LinkHub { main, social })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;

    fn created(store: &mut InMemoryStore, title: &str, kind: LinkKind) -> Link {
        let url = format!("https://example.com/{}", title.to_lowercase());
        create(store, NewLink::new(title, url, kind))
            .unwrap()
            .affected
            .remove(0)
    }

    fn titles(links: &[Link]) -> Vec<&str> {
        links.iter().map(|l| l.title.as_str()).collect()
    }

    #[test]
    fn url_validation() {
        assert!(validate_url("https://example.com").is_ok());
        assert!(validate_url("HTTP://example.com/x").is_ok());
        assert!(validate_url("mailto:me@example.com").is_ok());
        assert!(validate_url("/about").is_ok());
        assert!(validate_url("//evil.com").is_err());
        assert!(validate_url("javascript:alert(1)").is_err());
        assert!(validate_url("https://").is_err());
        assert!(validate_url("example.com").is_err());
        assert!(validate_url("").is_err());
    }

    #[test]
    fn order_is_per_kind() {
        let mut store = InMemoryStore::new();
        let blog = created(&mut store, "Blog", LinkKind::Main);
        let github = created(&mut store, "GitHub", LinkKind::Social);
        let shop = created(&mut store, "Shop", LinkKind::Main);
        assert_eq!((blog.order, github.order, shop.order), (1, 1, 2));
    }

    #[test]
    fn hub_shows_active_links_by_kind() {
        let mut store = InMemoryStore::new();
        let blog = created(&mut store, "Blog", LinkKind::Main);
        let shop = created(&mut store, "Shop", LinkKind::Main);
        created(&mut store, "GitHub", LinkKind::Social);
        let hidden = created(&mut store, "Hidden", LinkKind::Social);
        toggle_active(&mut store, &hidden.id).unwrap();
        reorder(&mut store, LinkKind::Main, &[shop.id, blog.id]).unwrap();

        let shown = hub(&store).unwrap();
        assert_eq!(titles(&shown.main), ["Shop", "Blog"]);
        assert_eq!(titles(&shown.social), ["GitHub"]);
    }

    #[test]
    fn toggle_flips_state() {
        let mut store = InMemoryStore::new();
        let link = created(&mut store, "Blog", LinkKind::Main);
        assert!(!toggle_active(&mut store, &link.id).unwrap().affected[0].active);
        assert!(toggle_active(&mut store, &link.id).unwrap().affected[0].active);
    }

    #[test]
    fn reorder_rejects_other_kinds() {
        let mut store = InMemoryStore::new();
        created(&mut store, "Blog", LinkKind::Main);
        let github = created(&mut store, "GitHub", LinkKind::Social);
        assert!(reorder(&mut store, LinkKind::Main, &[github.id]).is_err());
    }

    #[test]
    fn kind_change_appends() {
        let mut store = InMemoryStore::new();
        created(&mut store, "GitHub", LinkKind::Social);
        let blog = created(&mut store, "Blog", LinkKind::Main);
        let changes = LinkUpdate {
            kind: Some(LinkKind::Social),
            ..Default::default()
        };
        let moved = update(&mut store, &blog.id, changes).unwrap().affected.remove(0);
        assert_eq!(moved.kind, LinkKind::Social);
        assert_eq!(moved.order, 2);
    }

    #[test]
    fn deleted_links_leave_hub_and_restore_last() {
        let mut store = InMemoryStore::new();
        let first = created(&mut store, "First", LinkKind::Main);
        created(&mut store, "Second", LinkKind::Main);
        delete(&mut store, &first.id).unwrap();
        assert_eq!(titles(&hub(&store).unwrap().main), ["Second"]);

        let restored = restore(&mut store, &first.id).unwrap().affected.remove(0);
        assert_eq!(restored.order, 3);
        assert_eq!(titles(&hub(&store).unwrap().main), ["Second", "First"]);
    }
}
