//! # Domain Model
//!
//! Flat content records. Nothing here enforces cross-record integrity; that is
//! the job of the command layer, which validates references before saving.
//!
//! Every entity carries a `deleted` tombstone flag. Records are created live and
//! "deleting" only flips the flag, see [`crate::store`] for how reads hide them.

use crate::query::{AttrValue, Listable};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The persisted collections, one per entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Articles,
    Categories,
    Albums,
    Media,
    Tags,
    Links,
}

impl Collection {
    pub const ALL: [Collection; 6] = [
        Collection::Articles,
        Collection::Categories,
        Collection::Albums,
        Collection::Media,
        Collection::Tags,
        Collection::Links,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Articles => "articles",
            Collection::Categories => "categories",
            Collection::Albums => "albums",
            Collection::Media => "media",
            Collection::Tags => "tags",
            Collection::Links => "links",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.json", self.as_str())
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record the store knows how to persist and tombstone.
pub trait Entity: Clone + Serialize + DeserializeOwned {
    const COLLECTION: Collection;
    /// Human readable type name used in errors and messages.
    const KIND: &'static str;

    fn id(&self) -> Uuid;
    fn is_deleted(&self) -> bool;
    fn set_deleted(&mut self, deleted: bool);
}

macro_rules! closed_enum {
    ($name:ident, $what:literal, { $($variant:ident => $key:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $key),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($key => Ok($name::$variant),)+
                    other => Err(format!("Invalid {}: {}", $what, other)),
                }
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    #[default]
    Draft,
    Published,
    Scheduled,
}

closed_enum!(ArticleStatus, "article status", {
    Draft => "draft",
    Published => "published",
    Scheduled => "scheduled",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AlbumStatus {
    #[default]
    Draft,
    Published,
}

closed_enum!(AlbumStatus, "album status", {
    Draft => "draft",
    Published => "published",
});

/// Which content a category may classify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Article,
    Album,
    #[default]
    Both,
}

closed_enum!(CategoryKind, "category type", {
    Article => "article",
    Album => "album",
    Both => "both",
});

impl CategoryKind {
    pub fn accepts_articles(&self) -> bool {
        matches!(self, CategoryKind::Article | CategoryKind::Both)
    }

    pub fn accepts_albums(&self) -> bool {
        matches!(self, CategoryKind::Album | CategoryKind::Both)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    #[default]
    Main,
    Social,
}

closed_enum!(LinkKind, "link type", {
    Main => "main",
    Social => "social",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    System,
}

closed_enum!(ThemeMode, "theme", {
    Light => "light",
    Dark => "dark",
    System => "system",
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seo {
    #[serde(default)]
    pub meta_title: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub canonical_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub cover_media_id: Option<Uuid>,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub tag_ids: Vec<Uuid>,
    #[serde(default)]
    pub status: ArticleStatus,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
    /// Estimated reading time in minutes.
    #[serde(default)]
    pub reading_time: u32,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub seo: Seo,
    #[serde(default)]
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Article {
    pub fn new(title: String, slug: String, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            slug,
            content,
            excerpt: None,
            cover_media_id: None,
            category_id: None,
            tag_ids: Vec::new(),
            status: ArticleStatus::Draft,
            published_at: None,
            scheduled_at: None,
            reading_time: 0,
            featured: false,
            seo: Seo::default(),
            deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the article is visible on the public site at `now`.
    pub fn is_public(&self, now: DateTime<Utc>) -> bool {
        self.status == ArticleStatus::Published
            && self.published_at.map(|at| at <= now).unwrap_or(true)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: CategoryKind,
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn new(name: String, slug: String, kind: CategoryKind) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            slug,
            description: None,
            kind,
            parent_id: None,
            order: 0,
            deleted: false,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Album {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cover_media_id: Option<Uuid>,
    /// Gallery order is the order of this list.
    #[serde(default)]
    pub media_ids: Vec<Uuid>,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub status: AlbumStatus,
    #[serde(default)]
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Album {
    pub fn new(title: String, slug: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            slug,
            description: None,
            cover_media_id: None,
            media_ids: Vec::new(),
            category_id: None,
            tags: Vec::new(),
            status: AlbumStatus::Draft,
            deleted: false,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Media {
    pub id: Uuid,
    /// Storage key of the uploaded file.
    pub file_name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
}

impl Media {
    pub fn new(file_name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_name,
            title: String::new(),
            alt: String::new(),
            mime_type: None,
            deleted: false,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    /// Number of live articles carrying this tag.
    #[serde(default)]
    pub usage_count: u32,
    #[serde(default)]
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
}

impl Tag {
    pub fn new(name: String, slug: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            slug,
            usage_count: 0,
            deleted: false,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    pub id: Uuid,
    pub title: String,
    pub url: String,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub order: i64,
    #[serde(rename = "type", default)]
    pub kind: LinkKind,
    #[serde(default)]
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

impl Link {
    pub fn new(title: String, url: String, kind: LinkKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            url,
            active: true,
            order: 0,
            kind,
            deleted: false,
            created_at: Utc::now(),
        }
    }
}

/// Site-wide appearance settings. There is exactly one of these per store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSettings {
    pub site_title: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub theme: ThemeMode,
    pub accent_color: String,
    pub posts_per_page: usize,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            site_title: "Folio".to_string(),
            tagline: String::new(),
            theme: ThemeMode::System,
            accent_color: "#3b82f6".to_string(),
            posts_per_page: 10,
            updated_at: None,
        }
    }
}

macro_rules! impl_entity {
    ($ty:ty, $collection:expr, $kind:literal) => {
        impl Entity for $ty {
            const COLLECTION: Collection = $collection;
            const KIND: &'static str = $kind;

            fn id(&self) -> Uuid {
                self.id
            }

            fn is_deleted(&self) -> bool {
                self.deleted
            }

            fn set_deleted(&mut self, deleted: bool) {
                self.deleted = deleted;
            }
        }
    };
}

impl_entity!(Article, Collection::Articles, "Article");
impl_entity!(Category, Collection::Categories, "Category");
impl_entity!(Album, Collection::Albums, "Album");
impl_entity!(Media, Collection::Media, "Media");
impl_entity!(Tag, Collection::Tags, "Tag");
impl_entity!(Link, Collection::Links, "Link");

fn ids_as_list(ids: &[Uuid]) -> AttrValue {
    AttrValue::List(ids.iter().map(Uuid::to_string).collect())
}

impl Listable for Article {
    fn label(&self) -> &str {
        &self.title
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), self.slug.as_str()];
        if let Some(excerpt) = &self.excerpt {
            fields.push(excerpt);
        }
        fields
    }

    fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.published_at
            .or(self.scheduled_at)
            .or(Some(self.created_at))
    }

    fn attr(&self, name: &str) -> Option<AttrValue> {
        match name {
            "status" => Some(AttrValue::Enum(self.status.as_str().to_string())),
            "category" => Some(AttrValue::Ref(self.category_id)),
            "featured" => Some(AttrValue::Bool(self.featured)),
            "tags" => Some(ids_as_list(&self.tag_ids)),
            _ => None,
        }
    }
}

impl Listable for Category {
    fn label(&self) -> &str {
        &self.name
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.slug.as_str()];
        if let Some(description) = &self.description {
            fields.push(description);
        }
        fields
    }

    fn timestamp(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }

    fn order(&self) -> i64 {
        self.order
    }

    fn attr(&self, name: &str) -> Option<AttrValue> {
        match name {
            "type" | "kind" => Some(AttrValue::Enum(self.kind.as_str().to_string())),
            "parent" => Some(AttrValue::Ref(self.parent_id)),
            _ => None,
        }
    }
}

impl Listable for Album {
    fn label(&self) -> &str {
        &self.title
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), self.slug.as_str()];
        if let Some(description) = &self.description {
            fields.push(description);
        }
        fields
    }

    fn timestamp(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }

    fn attr(&self, name: &str) -> Option<AttrValue> {
        match name {
            "status" => Some(AttrValue::Enum(self.status.as_str().to_string())),
            "category" => Some(AttrValue::Ref(self.category_id)),
            "tags" => Some(AttrValue::List(self.tags.clone())),
            _ => None,
        }
    }
}

impl Listable for Media {
    fn label(&self) -> &str {
        if self.title.is_empty() {
            self.file_name.as_str()
        } else {
            self.title.as_str()
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.title.as_str(),
            self.file_name.as_str(),
            self.alt.as_str(),
        ]
    }

    fn timestamp(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }

    fn attr(&self, name: &str) -> Option<AttrValue> {
        match name {
            "mime" => self.mime_type.clone().map(AttrValue::Enum),
            _ => None,
        }
    }
}

impl Listable for Tag {
    fn label(&self) -> &str {
        &self.name
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.slug.as_str()]
    }

    fn timestamp(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }

    /// Tags order by popularity.
    fn order(&self) -> i64 {
        i64::from(self.usage_count)
    }

    fn attr(&self, name: &str) -> Option<AttrValue> {
        match name {
            "used" => Some(AttrValue::Bool(self.usage_count > 0)),
            _ => None,
        }
    }
}

impl Listable for Link {
    fn label(&self) -> &str {
        &self.title
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.url.as_str()]
    }

    fn timestamp(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }

    fn order(&self) -> i64 {
        self.order
    }

    fn attr(&self, name: &str) -> Option<AttrValue> {
        match name {
            "type" | "kind" => Some(AttrValue::Enum(self.kind.as_str().to_string())),
            "active" => Some(AttrValue::Bool(self.active)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_entities_start_live() {
        let article = Article::new("Hello".into(), "hello".into(), String::new());
        assert!(!article.deleted);
        assert_eq!(article.status, ArticleStatus::Draft);

        let link = Link::new("Site".into(), "https://example.com".into(), LinkKind::Main);
        assert!(link.active);
        assert!(!link.is_deleted());
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!(
            "Published".parse::<ArticleStatus>().unwrap(),
            ArticleStatus::Published
        );
        assert!("archived".parse::<ArticleStatus>().is_err());
        assert_eq!("SOCIAL".parse::<LinkKind>().unwrap(), LinkKind::Social);
    }

    #[test]
    fn category_kind_acceptance() {
        assert!(CategoryKind::Both.accepts_articles());
        assert!(CategoryKind::Both.accepts_albums());
        assert!(CategoryKind::Article.accepts_articles());
        assert!(!CategoryKind::Article.accepts_albums());
        assert!(!CategoryKind::Album.accepts_articles());
    }

    #[test]
    fn category_kind_serializes_as_type() {
        let category = Category::new("Travel".into(), "travel".into(), CategoryKind::Album);
        let json = serde_json::to_value(&category).unwrap();
        assert_eq!(json["type"], "album");
    }

    #[test]
    fn article_missing_optional_fields_deserialize() {
        let json = r#"{
            "id": "7f1c1e5e-2f6e-4d1e-9a43-1a3b7c8d9e00",
            "title": "Minimal",
            "slug": "minimal",
            "content": "",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        }"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.status, ArticleStatus::Draft);
        assert!(article.tag_ids.is_empty());
        assert!(!article.deleted);
    }

    #[test]
    fn article_public_visibility() {
        let now = Utc::now();
        let mut article = Article::new("A".into(), "a".into(), String::new());
        assert!(!article.is_public(now));

        article.status = ArticleStatus::Published;
        article.published_at = Some(now - chrono::Duration::hours(1));
        assert!(article.is_public(now));

        article.published_at = Some(now + chrono::Duration::hours(1));
        assert!(!article.is_public(now));
    }

    #[test]
    fn media_label_falls_back_to_file_name() {
        let mut media = Media::new("uploads/cat.jpg".into());
        assert_eq!(media.label(), "uploads/cat.jpg");
        media.title = "Cat".into();
        assert_eq!(media.label(), "Cat");
    }

    #[test]
    fn article_attrs() {
        let mut article = Article::new("A".into(), "a".into(), String::new());
        let tag = Uuid::new_v4();
        article.tag_ids = vec![tag];
        article.featured = true;

        assert_eq!(
            article.attr("status"),
            Some(AttrValue::Enum("draft".into()))
        );
        assert_eq!(article.attr("featured"), Some(AttrValue::Bool(true)));
        assert_eq!(
            article.attr("tags"),
            Some(AttrValue::List(vec![tag.to_string()]))
        );
        assert_eq!(article.attr("nope"), None);
    }
}
