//! One handler per command group.
//!
//! Handlers turn parsed arguments into API calls and hand the results to
//! [`Output`]. Anything the user typed as a selector is resolved by the API.

use super::render::{self, TableRow};
use super::setup::{
    AlbumCommands, ArticleCommands, BodyArgs, CategoryCommands, LinkCommands, ListArgs,
    MediaCommands, QueryArgs, SettingsCommands, TagCommands,
};
use anyhow::{Context, Result};
use folioapp::commands::albums::{AlbumUpdate, NewAlbum};
use folioapp::commands::articles::{ArticleUpdate, NewArticle};
use folioapp::commands::categories::{CategoryUpdate, NewCategory};
use folioapp::commands::links::{LinkUpdate, NewLink};
use folioapp::commands::media::{MediaUpdate, NewMedia};
use folioapp::commands::settings::SettingsUpdate;
use folioapp::commands::CmdResult;
use folioapp::model::{Category, Entity, Media, Tag};
use folioapp::query::record::RecordFields;
use folioapp::query::{AttrFilter, AttrValue, Listable, ListQuery, SortMode};
use folioapp::store::DataStore;
use folioapp::FolioApi;
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use uuid::Uuid;

/// Where results go: styled text or JSON on stdout.
pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    /// A list command: the page, then any messages.
    pub fn listing<T: Serialize + TableRow>(&self, result: CmdResult<T>, empty: &str) -> Result<()> {
        if self.json {
            return self.json_value(&result.listed);
        }
        if let Some(page) = &result.listed {
            print!("{}", render::page(page, empty));
        }
        print!("{}", render::messages(&result.messages));
        Ok(())
    }

    /// A mutation: the messages, or the whole result as JSON. Fails after
    /// printing when part of a batch was refused.
    pub fn changed<T: Serialize>(&self, result: CmdResult<T>) -> Result<()> {
        if self.json {
            self.json_value(&result)?;
        } else {
            print!("{}", render::messages(&result.messages));
        }
        match result.error_count() {
            0 => Ok(()),
            failed => anyhow::bail!("{} of the selected records could not be changed", failed),
        }
    }

    /// A single value with its own text layout.
    pub fn value<T: Serialize>(&self, value: &T, text: impl FnOnce(&T) -> String) -> Result<()> {
        if self.json {
            return self.json_value(value);
        }
        print!("{}", text(value));
        Ok(())
    }

    fn json_value<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}

/// Selector values meaning "clear this reference".
fn is_none(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("none")
}

fn build_query(base: ListQuery, args: &ListArgs) -> ListQuery {
    let mut query = base;
    if let Some(sort) = args.sort {
        query.set_sort(sort);
    }
    if let Some(size) = args.page_size {
        query.set_page_size(size);
    }
    if let Some(term) = &args.search {
        query.set_search(term.clone());
    }
    // Setters reset the page, so it goes last.
    query.set_page(args.page);
    query
}

/// `--category` style filter: "all", "none" or a selector.
fn ref_filter<S: DataStore, T: Entity + Listable>(
    api: &FolioApi<S>,
    attr: &str,
    raw: &str,
) -> Result<AttrFilter> {
    if raw.trim().eq_ignore_ascii_case("all") {
        return Ok(AttrFilter::choice(attr, "all"));
    }
    if is_none(raw) {
        return Ok(AttrFilter::eq(attr, AttrValue::Ref(None)));
    }
    let id = api.resolve::<T>(raw)?;
    Ok(AttrFilter::eq(attr, AttrValue::Ref(Some(id))))
}

fn bool_filter(attr: &str, value: bool) -> AttrFilter {
    AttrFilter::eq(attr, AttrValue::Bool(value))
}

/// `Some(None)` for "none", `Some(Some(id))` for a selector.
fn clearable_ref<S: DataStore, T: Entity + Listable>(
    api: &FolioApi<S>,
    raw: Option<String>,
) -> Result<Option<Option<Uuid>>> {
    match raw {
        None => Ok(None),
        Some(v) if is_none(&v) => Ok(Some(None)),
        Some(v) => Ok(Some(Some(api.resolve::<T>(&v)?))),
    }
}

fn clearable_text(raw: Option<String>) -> Option<Option<String>> {
    raw.map(|v| if is_none(&v) { None } else { Some(v) })
}

fn optional_ref<S: DataStore, T: Entity + Listable>(
    api: &FolioApi<S>,
    raw: Option<&str>,
) -> Result<Option<Uuid>> {
    Ok(raw.map(|v| api.resolve::<T>(v)).transpose()?)
}

/// Tag ids for names, creating the missing tags.
fn tag_ids<S: DataStore>(api: &mut FolioApi<S>, names: &[String], out: &Output) -> Result<Vec<Uuid>> {
    if names.is_empty() {
        return Ok(Vec::new());
    }
    let ensured = api.ensure_tags(names)?;
    if !out.json {
        print!("{}", render::messages(&ensured.messages));
    }
    Ok(ensured.affected.iter().map(|t| t.id).collect())
}

fn read_body(body: &BodyArgs) -> Result<Option<String>> {
    if let Some(content) = &body.content {
        return Ok(Some(content.clone()));
    }
    match &body.file {
        Some(path) => Ok(Some(read_source(path)?)),
        None => Ok(None),
    }
}

/// Reads a file, or stdin for `-`.
fn read_source(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

pub fn articles<S: DataStore>(
    api: &mut FolioApi<S>,
    command: ArticleCommands,
    out: &Output,
) -> Result<()> {
    match command {
        ArticleCommands::List {
            list,
            status,
            category,
            tag,
            featured,
            deleted,
        } => {
            let mut query = api.article_query();
            if let Some(status) = status {
                query.set_filter(AttrFilter::choice("status", &status));
            }
            if let Some(category) = category {
                query.set_filter(ref_filter::<S, Category>(api, "category", &category)?);
            }
            if let Some(tag) = tag {
                let id = api.resolve::<Tag>(&tag)?;
                query.set_filter(AttrFilter::contains("tags", id.to_string()));
            }
            if let Some(featured) = featured {
                query.set_filter(bool_filter("featured", featured));
            }
            let query = build_query(query, &list);
            if deleted {
                out.listing(api.list_deleted_articles(&query)?, "No deleted articles.")
            } else {
                out.listing(api.list_articles(&query)?, "No articles found.")
            }
        }
        ArticleCommands::Show { article } => {
            let article = api.get_article(&article)?;
            let category = article
                .category_id
                .and_then(|id| api.store().get::<Category>(&id).ok())
                .map(|c| c.name);
            let tags: Vec<String> = article
                .tag_ids
                .iter()
                .filter_map(|id| api.store().get::<Tag>(id).ok())
                .map(|t| t.name)
                .collect();
            out.value(&article, |a| render::article(a, category.as_deref(), &tags))
        }
        ArticleCommands::Create {
            title,
            body,
            slug,
            excerpt,
            category,
            tags,
            status,
            schedule,
            cover,
            featured,
        } => {
            let category_id = optional_ref::<S, Category>(api, category.as_deref())?;
            let cover_media_id = optional_ref::<S, Media>(api, cover.as_deref())?;
            let content = read_body(&body)?.unwrap_or_default();
            let tag_ids = tag_ids(api, &tags, out)?;
            let input = NewArticle {
                title: title.join(" "),
                content,
                slug,
                excerpt,
                cover_media_id,
                category_id,
                tag_ids,
                status,
                scheduled_at: schedule,
                featured,
                ..Default::default()
            };
            out.changed(api.create_article(input)?)
        }
        ArticleCommands::Update {
            article,
            title,
            body,
            slug,
            excerpt,
            category,
            tags,
            clear_tags,
            status,
            schedule,
            cover,
            featured,
        } => {
            let tag_ids = if clear_tags {
                Some(Vec::new())
            } else if tags.is_empty() {
                None
            } else {
                Some(tag_ids(api, &tags, out)?)
            };
            let changes = ArticleUpdate {
                title,
                content: read_body(&body)?,
                slug,
                excerpt: clearable_text(excerpt),
                cover_media_id: clearable_ref::<S, Media>(api, cover)?,
                category_id: clearable_ref::<S, Category>(api, category)?,
                tag_ids,
                status,
                scheduled_at: schedule.map(Some),
                featured,
                ..Default::default()
            };
            out.changed(api.update_article(&article, changes)?)
        }
        ArticleCommands::Delete { articles } => out.changed(api.delete_articles(&articles)?),
        ArticleCommands::Restore { articles } => out.changed(api.restore_articles(&articles)?),
        ArticleCommands::PublishDue => out.changed(api.publish_due()?),
        ArticleCommands::Feed { list } => {
            let query = build_query(api.feed_query()?, &list);
            out.listing(api.public_feed(&query)?, "Nothing published yet.")
        }
    }
}

pub fn categories<S: DataStore>(
    api: &mut FolioApi<S>,
    command: CategoryCommands,
    out: &Output,
) -> Result<()> {
    match command {
        CategoryCommands::List {
            list,
            kind,
            deleted,
        } => {
            let mut query = api.category_query();
            if let Some(kind) = kind {
                query.set_filter(AttrFilter::choice("kind", &kind));
            }
            let query = build_query(query, &list);
            if deleted {
                out.listing(api.list_deleted::<Category>(&query)?, "No deleted categories.")
            } else {
                out.listing(api.list_categories(&query)?, "No categories found.")
            }
        }
        CategoryCommands::Tree { kind } => {
            let nodes = api.category_tree(kind)?;
            out.value(&nodes, |n| render::tree(n))
        }
        CategoryCommands::Create {
            name,
            slug,
            description,
            kind,
            parent,
        } => {
            let parent_id = optional_ref::<S, Category>(api, parent.as_deref())?;
            let input = NewCategory {
                name: name.join(" "),
                slug,
                description,
                kind,
                parent_id,
                order: None,
            };
            out.changed(api.create_category(input)?)
        }
        CategoryCommands::Update {
            category,
            name,
            slug,
            description,
            kind,
            parent,
        } => {
            let changes = CategoryUpdate {
                name,
                slug,
                description: clearable_text(description),
                kind,
                parent_id: clearable_ref::<S, Category>(api, parent)?,
                order: None,
            };
            out.changed(api.update_category(&category, changes)?)
        }
        CategoryCommands::Delete { categories } => {
            out.changed(api.delete_categories(&categories)?)
        }
        CategoryCommands::Restore { categories } => {
            out.changed(api.restore_categories(&categories)?)
        }
        CategoryCommands::Reorder { categories } => {
            out.changed(api.reorder_categories(&categories)?)
        }
    }
}

pub fn albums<S: DataStore>(
    api: &mut FolioApi<S>,
    command: AlbumCommands,
    out: &Output,
) -> Result<()> {
    match command {
        AlbumCommands::List {
            list,
            status,
            category,
            tag,
            deleted,
        } => {
            let mut query = api.album_query();
            if let Some(status) = status {
                query.set_filter(AttrFilter::choice("status", &status));
            }
            if let Some(category) = category {
                query.set_filter(ref_filter::<S, Category>(api, "category", &category)?);
            }
            if let Some(tag) = tag {
                query.set_filter(AttrFilter::contains("tags", tag));
            }
            let query = build_query(query, &list);
            if deleted {
                out.listing(api.list_deleted::<folioapp::model::Album>(&query)?, "No deleted albums.")
            } else {
                out.listing(api.list_albums(&query)?, "No albums found.")
            }
        }
        AlbumCommands::Create {
            title,
            slug,
            description,
            category,
            tags,
            status,
            media,
            cover,
        } => {
            let category_id = optional_ref::<S, Category>(api, category.as_deref())?;
            let cover_media_id = optional_ref::<S, Media>(api, cover.as_deref())?;
            let media_ids = api.resolve_many::<Media, String>(&media)?;
            let input = NewAlbum {
                title: title.join(" "),
                slug,
                description,
                cover_media_id,
                media_ids,
                category_id,
                tags,
                status,
            };
            out.changed(api.create_album(input)?)
        }
        AlbumCommands::Update {
            album,
            title,
            slug,
            description,
            category,
            tags,
            status,
            cover,
        } => {
            let changes = AlbumUpdate {
                title,
                slug,
                description: clearable_text(description),
                cover_media_id: clearable_ref::<S, Media>(api, cover)?,
                category_id: clearable_ref::<S, Category>(api, category)?,
                tags: if tags.is_empty() { None } else { Some(tags) },
                status,
            };
            out.changed(api.update_album(&album, changes)?)
        }
        AlbumCommands::Delete { albums } => out.changed(api.delete_albums(&albums)?),
        AlbumCommands::Restore { albums } => out.changed(api.restore_albums(&albums)?),
        AlbumCommands::AddMedia { album, media } => {
            out.changed(api.add_album_media(&album, &media)?)
        }
        AlbumCommands::RemoveMedia { album, media } => {
            out.changed(api.remove_album_media(&album, &media)?)
        }
        AlbumCommands::ReorderMedia { album, media } => {
            out.changed(api.reorder_album_media(&album, &media)?)
        }
    }
}

pub fn media<S: DataStore>(
    api: &mut FolioApi<S>,
    command: MediaCommands,
    out: &Output,
) -> Result<()> {
    match command {
        MediaCommands::List {
            list,
            mime,
            deleted,
        } => {
            let mut query = api.media_query();
            if let Some(mime) = mime {
                query.set_filter(AttrFilter::choice("mime", &mime));
            }
            let query = build_query(query, &list);
            if deleted {
                out.listing(api.list_deleted::<Media>(&query)?, "No deleted media.")
            } else {
                out.listing(api.list_media(&query)?, "The media library is empty.")
            }
        }
        MediaCommands::Add {
            file_name,
            title,
            alt,
            mime,
        } => {
            let input = NewMedia {
                file_name,
                title,
                alt,
                mime_type: mime,
            };
            out.changed(api.register_media(input)?)
        }
        MediaCommands::Update {
            media,
            title,
            alt,
            mime,
        } => {
            let changes = MediaUpdate {
                title,
                alt,
                mime_type: clearable_text(mime),
            };
            out.changed(api.update_media(&media, changes)?)
        }
        MediaCommands::Delete { media } => out.changed(api.delete_media(&media)?),
        MediaCommands::Restore { media } => out.changed(api.restore_media(&media)?),
    }
}

pub fn tags<S: DataStore>(api: &mut FolioApi<S>, command: TagCommands, out: &Output) -> Result<()> {
    match command {
        TagCommands::List {
            list,
            used,
            deleted,
        } => {
            let mut query = api.tag_query();
            if let Some(used) = used {
                query.set_filter(bool_filter("used", used));
            }
            let query = build_query(query, &list);
            if deleted {
                out.listing(api.list_deleted::<Tag>(&query)?, "No deleted tags.")
            } else {
                out.listing(api.list_tags(&query)?, "No tags found.")
            }
        }
        TagCommands::Create { name, slug } => {
            out.changed(api.create_tag(&name.join(" "), slug.as_deref())?)
        }
        TagCommands::Rename { tag, name } => out.changed(api.rename_tag(&tag, &name)?),
        TagCommands::Delete { tags } => out.changed(api.delete_tags(&tags)?),
        TagCommands::Restore { tags } => out.changed(api.restore_tags(&tags)?),
        TagCommands::Recount => out.changed(api.recount_tags()?),
    }
}

pub fn links<S: DataStore>(
    api: &mut FolioApi<S>,
    command: LinkCommands,
    out: &Output,
) -> Result<()> {
    match command {
        LinkCommands::List {
            list,
            kind,
            active,
            deleted,
        } => {
            let mut query = api.link_query();
            if let Some(kind) = kind {
                query.set_filter(AttrFilter::choice("kind", &kind));
            }
            if let Some(active) = active {
                query.set_filter(bool_filter("active", active));
            }
            let query = build_query(query, &list);
            if deleted {
                out.listing(api.list_deleted::<folioapp::model::Link>(&query)?, "No deleted links.")
            } else {
                out.listing(api.list_links(&query)?, "No links found.")
            }
        }
        LinkCommands::Create {
            title,
            url,
            kind,
            inactive,
        } => {
            let mut input = NewLink::new(title, url, kind);
            input.active = !inactive;
            out.changed(api.create_link(input)?)
        }
        LinkCommands::Update {
            link,
            title,
            url,
            kind,
            active,
        } => {
            let changes = LinkUpdate {
                title,
                url,
                kind,
                active,
            };
            out.changed(api.update_link(&link, changes)?)
        }
        LinkCommands::Toggle { links } => out.changed(api.toggle_links(&links)?),
        LinkCommands::Reorder { kind, links } => out.changed(api.reorder_links(kind, &links)?),
        LinkCommands::Delete { links } => out.changed(api.delete_links(&links)?),
        LinkCommands::Restore { links } => out.changed(api.restore_links(&links)?),
        LinkCommands::Hub => {
            let hub = api.link_hub()?;
            out.value(&hub, |h| render::hub(h))
        }
    }
}

pub fn settings<S: DataStore>(
    api: &mut FolioApi<S>,
    command: SettingsCommands,
    out: &Output,
) -> Result<()> {
    match command {
        SettingsCommands::Show => {
            let settings = api.settings()?;
            out.value(&settings, |s| render::settings(s))
        }
        SettingsCommands::Set {
            title,
            tagline,
            theme,
            accent,
            posts_per_page,
        } => {
            let changes = SettingsUpdate {
                site_title: title,
                tagline,
                theme,
                accent_color: accent,
                posts_per_page,
            };
            out.changed(api.update_settings(changes)?)
        }
    }
}

/// Splits `attr=value`.
fn parse_filter(raw: &str) -> Result<AttrFilter> {
    let (attr, value) = raw
        .split_once('=')
        .with_context(|| format!("Invalid filter '{}', expected ATTR=VALUE", raw))?;
    let attr = attr.trim();
    if attr.is_empty() {
        anyhow::bail!("Invalid filter '{}', attribute name is empty", raw);
    }
    Ok(AttrFilter::choice(attr, value))
}

pub fn query<S: DataStore>(api: &FolioApi<S>, args: QueryArgs, out: &Output) -> Result<()> {
    let json = read_source(&args.file)?;
    let mut fields = RecordFields {
        label: args.label,
        date: args.date,
        order: args.order,
        ..RecordFields::default()
    };
    if !args.search_fields.is_empty() {
        fields.search = args.search_fields;
    }

    let mut query = ListQuery::new(SortMode::Original, api.config().page_size);
    for raw in &args.filters {
        query.set_filter(parse_filter(raw)?);
    }
    let query = build_query(query, &args.list);

    let page = api.query_json(&json, fields, &query)?;
    if out.json {
        return out.value(&page, |_| String::new());
    }
    print!("{}", render::page(&page, "No records match."));
    Ok(())
}
