//! Text rendering of command results.
//!
//! Every function here builds a `String`; printing is left to the caller so
//! the layouts can be tested without a terminal.

use super::styles;
use chrono::{DateTime, Utc};
use folioapp::commands::categories::CategoryNode;
use folioapp::commands::links::LinkHub;
use folioapp::commands::CmdMessage;
use folioapp::model::{Album, Article, Category, Link, Media, SiteSettings, Tag};
use folioapp::query::record::JsonRecord;
use folioapp::query::{Listable, QueryPage};
use std::fmt::Write;
use timeago::Formatter;
use unicode_width::UnicodeWidthStr;
use uuid::Uuid;

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;
const ID_WIDTH: usize = 8;
const BADGE_WIDTH: usize = 10;

/// What a listing shows for one record.
pub struct Row {
    pub id: Option<Uuid>,
    pub title: String,
    /// Short status word, colored by [`styles::status`].
    pub badge: Option<String>,
    pub detail: String,
    pub time: Option<DateTime<Utc>>,
    pub deleted: bool,
}

pub trait TableRow {
    fn row(&self) -> Row;
}

impl TableRow for Article {
    fn row(&self) -> Row {
        let badge = if self.featured {
            format!("{}*", self.status.as_str())
        } else {
            self.status.as_str().to_string()
        };
        Row {
            id: Some(self.id),
            title: self.title.clone(),
            badge: Some(badge),
            detail: format!("{} min", self.reading_time),
            time: self.timestamp(),
            deleted: self.deleted,
        }
    }
}

impl TableRow for Category {
    fn row(&self) -> Row {
        Row {
            id: Some(self.id),
            title: self.name.clone(),
            badge: Some(self.kind.as_str().to_string()),
            detail: format!("/{}", self.slug),
            time: Some(self.created_at),
            deleted: self.deleted,
        }
    }
}

impl TableRow for Album {
    fn row(&self) -> Row {
        Row {
            id: Some(self.id),
            title: self.title.clone(),
            badge: Some(self.status.as_str().to_string()),
            detail: format!("{} items", self.media_ids.len()),
            time: Some(self.created_at),
            deleted: self.deleted,
        }
    }
}

impl TableRow for Media {
    fn row(&self) -> Row {
        Row {
            id: Some(self.id),
            title: self.label().to_string(),
            badge: None,
            detail: self.mime_type.clone().unwrap_or_default(),
            time: Some(self.created_at),
            deleted: self.deleted,
        }
    }
}

impl TableRow for Tag {
    fn row(&self) -> Row {
        Row {
            id: Some(self.id),
            title: self.name.clone(),
            badge: None,
            detail: format!("{} uses", self.usage_count),
            time: Some(self.created_at),
            deleted: self.deleted,
        }
    }
}

impl TableRow for Link {
    fn row(&self) -> Row {
        let badge = if self.active { self.kind.as_str() } else { "inactive" };
        Row {
            id: Some(self.id),
            title: self.title.clone(),
            badge: Some(badge.to_string()),
            detail: self.url.clone(),
            time: Some(self.created_at),
            deleted: self.deleted,
        }
    }
}

impl TableRow for JsonRecord {
    fn row(&self) -> Row {
        Row {
            id: None,
            title: self.label().to_string(),
            badge: None,
            detail: String::new(),
            time: self.timestamp(),
            deleted: false,
        }
    }
}

pub fn messages(messages: &[CmdMessage]) -> String {
    let mut out = String::new();
    for message in messages {
        let _ = writeln!(out, "{}", styles::message(message.level).apply_to(&message.content));
    }
    out
}

/// One listing page: numbered rows followed by a page footer.
pub fn page<T: TableRow>(page: &QueryPage<T>, empty: &str) -> String {
    if page.is_empty() {
        let text = if page.total_filtered > 0 {
            format!("Page {} is past the end ({} pages).", page.page, page.total_pages)
        } else {
            empty.to_string()
        };
        return format!("{}\n", styles::muted().apply_to(text));
    }

    let first = (page.page.max(1) - 1) * page.page_size.max(1);
    let mut out = String::new();
    for (i, item) in page.items.iter().enumerate() {
        out.push_str(&line(first + i + 1, &item.row()));
        out.push('\n');
    }
    let _ = writeln!(
        out,
        "\n{}",
        styles::muted().apply_to(format!(
            "Page {} of {} · {} {}",
            page.page,
            page.total_pages,
            page.total_filtered,
            if page.total_filtered == 1 { "match" } else { "matches" }
        ))
    );
    out
}

fn line(position: usize, row: &Row) -> String {
    let idx = format!("{:>3}. ", position);
    let id = row
        .id
        .map(|id| id.simple().to_string()[..ID_WIDTH].to_string())
        .unwrap_or_default();
    let id = format!("{:<width$}  ", id, width = ID_WIDTH);
    let badge = row.badge.clone().unwrap_or_default();
    let badge_cell = format!(" {:<width$}", badge, width = BADGE_WIDTH);
    let time = row.time.map(format_time_ago).unwrap_or_default();
    let time = format!("{:>width$}", time, width = TIME_WIDTH);

    let fixed = idx.width() + id.width() + badge_cell.width() + TIME_WIDTH + 1;
    let available = LINE_WIDTH.saturating_sub(fixed);
    let text = if row.detail.is_empty() {
        row.title.clone()
    } else {
        format!("{}  {}", row.title, row.detail)
    };
    let text = truncate_to_width(&text, available);
    let padding = available.saturating_sub(text.width());

    let idx = if row.deleted {
        styles::deleted().apply_to(idx)
    } else {
        styles::index().apply_to(idx)
    };
    let badge_style = styles::status(badge.trim_end_matches('*'));
    format!(
        "{}{}{}{} {}{}",
        idx,
        styles::muted().apply_to(id),
        text,
        " ".repeat(padding),
        badge_style.apply_to(badge_cell),
        styles::time().apply_to(time)
    )
}

/// Full view of one article, header then markdown body.
pub fn article(article: &Article, category: Option<&str>, tags: &[String]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", styles::title().apply_to(&article.title));
    let _ = writeln!(
        out,
        "{}",
        styles::muted().apply_to(format!(
            "/{} · {} · {} min read",
            article.slug, article.status, article.reading_time
        ))
    );
    if let Some(at) = article.published_at {
        let _ = writeln!(out, "published {}", at.format("%Y-%m-%d %H:%M"));
    }
    if let Some(at) = article.scheduled_at {
        let _ = writeln!(out, "scheduled {}", at.format("%Y-%m-%d %H:%M"));
    }
    if let Some(name) = category {
        let _ = writeln!(out, "category  {}", name);
    }
    if !tags.is_empty() {
        let _ = writeln!(out, "tags      {}", tags.join(", "));
    }
    if let Some(excerpt) = &article.excerpt {
        let _ = writeln!(out, "\n{}", styles::muted().italic().apply_to(excerpt));
    }
    let _ = writeln!(out, "{}", "-".repeat(32));
    let _ = writeln!(out, "{}", article.content);
    out
}

pub fn tree(nodes: &[CategoryNode]) -> String {
    if nodes.is_empty() {
        return format!("{}\n", styles::muted().apply_to("No categories yet."));
    }
    let mut out = String::new();
    for node in nodes {
        tree_node(&mut out, node, 0);
    }
    out
}

fn tree_node(out: &mut String, node: &CategoryNode, depth: usize) {
    let _ = writeln!(
        out,
        "{}{} {}",
        "  ".repeat(depth),
        node.category.name,
        styles::muted().apply_to(format!("({})", node.category.kind))
    );
    for child in &node.children {
        tree_node(out, child, depth + 1);
    }
}

pub fn hub(hub: &LinkHub) -> String {
    if hub.is_empty() {
        return format!("{}\n", styles::muted().apply_to("No active links."));
    }
    let mut out = String::new();
    for (heading, links) in [("Links", &hub.main), ("Social", &hub.social)] {
        if links.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
        }
        let _ = writeln!(out, "{}", styles::header().apply_to(heading));
        for link in links {
            let _ = writeln!(out, "  {}  {}", link.title, styles::muted().apply_to(&link.url));
        }
    }
    out
}

pub fn settings(settings: &SiteSettings) -> String {
    let mut out = String::new();
    let rows = [
        ("title", settings.site_title.clone()),
        ("tagline", settings.tagline.clone()),
        ("theme", settings.theme.to_string()),
        ("accent", settings.accent_color.clone()),
        ("posts per page", settings.posts_per_page.to_string()),
    ];
    for (key, value) in rows {
        let _ = writeln!(out, "{:<16}{}", styles::muted().apply_to(key), value);
    }
    out
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let mut formatter = Formatter::new();
    match duration.to_std() {
        Ok(past) => formatter.convert(past),
        Err(_) => {
            let ahead = (-duration).to_std().unwrap_or_default();
            format!("in {}", formatter.ago("").convert(ahead).trim_end())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use folioapp::model::{CategoryKind, LinkKind};

    fn plain(s: &str) -> String {
        console::strip_ansi_codes(s).to_string()
    }

    #[test]
    fn truncates_wide_text_to_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("exactly10!", 10), "exactly10!");
        assert_eq!(truncate_to_width("a long title here", 8), "a long …");
        let wide = truncate_to_width("日本語のタイトル", 7);
        assert!(wide.width() <= 7);
        assert!(wide.ends_with('…'));
    }

    #[test]
    fn time_ago_covers_past_and_future() {
        let past = format_time_ago(Utc::now() - Duration::hours(3));
        assert!(past.contains("hours ago"), "{}", past);
        let future = format_time_ago(Utc::now() + Duration::days(3));
        assert!(future.starts_with("in "), "{}", future);
        assert!(!future.contains("ago"));
    }

    #[test]
    fn page_numbers_rows_from_the_page_offset() {
        let tags: Vec<Tag> = ["rust", "web"]
            .into_iter()
            .map(|n| Tag::new(n.to_string(), n.to_string()))
            .collect();
        let listing = QueryPage {
            items: tags,
            total_filtered: 12,
            total_pages: 2,
            page: 2,
            page_size: 10,
        };
        let out = plain(&page(&listing, "none"));
        assert!(out.contains(" 11. "));
        assert!(out.contains(" 12. "));
        assert!(out.contains("Page 2 of 2 · 12 matches"));
        for line in out.lines().take(2) {
            assert!(line.width() <= LINE_WIDTH, "{}", line);
        }
    }

    #[test]
    fn empty_page_distinguishes_no_matches_from_past_the_end() {
        let none: QueryPage<Tag> = QueryPage {
            items: vec![],
            total_filtered: 0,
            total_pages: 0,
            page: 1,
            page_size: 10,
        };
        assert_eq!(plain(&page(&none, "No tags.")), "No tags.\n");

        let past = QueryPage::<Tag> {
            total_filtered: 3,
            total_pages: 1,
            page: 4,
            ..none
        };
        assert!(plain(&page(&past, "No tags.")).contains("past the end"));
    }

    #[test]
    fn tree_indents_children() {
        let parent = Category::new("Travel".into(), "travel".into(), CategoryKind::Both);
        let child = Category::new("Japan".into(), "japan".into(), CategoryKind::Album);
        let nodes = vec![CategoryNode {
            category: parent,
            children: vec![CategoryNode {
                category: child,
                children: vec![],
            }],
        }];
        let out = plain(&tree(&nodes));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Travel (both)");
        assert_eq!(lines[1], "  Japan (album)");
    }

    #[test]
    fn hub_groups_main_and_social() {
        let links = LinkHub {
            main: vec![Link::new("Blog".into(), "https://a.dev".into(), LinkKind::Main)],
            social: vec![Link::new("GitHub".into(), "https://github.com/a".into(), LinkKind::Social)],
        };
        let out = plain(&hub(&links));
        let main_at = out.find("Links").unwrap();
        let social_at = out.find("Social").unwrap();
        assert!(main_at < social_at);
        assert!(out.contains("GitHub  https://github.com/a"));
    }

    #[test]
    fn messages_keep_order() {
        let out = plain(&messages(&[
            CmdMessage::success("Created"),
            CmdMessage::warning("Careful"),
        ]));
        assert_eq!(out, "Created\nCareful\n");
    }
}
