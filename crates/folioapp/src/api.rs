//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single
//! entry point for all folio operations, whichever UI is in front of it.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Dispatches** to the appropriate command function
//! - **Normalizes inputs**: turns user selectors (UUIDs, UUID prefixes, names,
//!   slugs) into ids, see [`crate::selector`]
//! - **Applies configuration**: default sort and page size per listing, content
//!   options for derived article fields
//! - **Returns structured types** (`Result<CmdResult<T>>`)
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: that belongs in `commands/*.rs`
//! - **I/O**: no stdout, stderr or formatting
//!
//! ## Batches
//!
//! Delete, restore and toggle accept several selectors. They are all resolved
//! before anything is changed, so a typo fails the whole batch up front. The
//! per-record results are merged into one [`CmdResult`].
//!
//! A record the command refuses (a tag in use, a category with children)
//! does not stop the batch. Its error becomes an error message next to the
//! records that did change. Only a batch where every record fails returns
//! `Err`. Categories are deleted children first and restored parents first,
//! so the selector order does not matter.
//!
//! ## Generic Over DataStore
//!
//! `FolioApi<S: DataStore>` is generic over the storage backend:
//! - Production: `FolioApi<FileStore>`
//! - Testing: `FolioApi<InMemoryStore>`

use crate::commands::albums::{self, AlbumUpdate, NewAlbum};
use crate::commands::articles::{self, ArticleUpdate, NewArticle};
use crate::commands::categories::{self, CategoryNode, CategoryUpdate, NewCategory};
use crate::commands::links::{self, LinkHub, LinkUpdate, NewLink};
use crate::commands::media::{self, MediaUpdate, NewMedia};
use crate::commands::settings::{self, SettingsUpdate};
use crate::commands::{tags, CmdMessage, CmdResult, ContentOptions};
use crate::config::FolioConfig;
use crate::error::Result;
use crate::model::{
    Album, Article, Category, CategoryKind, Entity, Link, LinkKind, Media, SiteSettings, Tag,
};
use crate::query::record::{parse_records, JsonRecord, RecordFields};
use crate::query::{self, ListQuery, QueryPage, SortMode};
use crate::selector;
use crate::store::DataStore;
use chrono::{DateTime, Utc};
use std::cmp::Reverse;
use uuid::Uuid;

/// The main API facade for folio operations.
pub struct FolioApi<S: DataStore> {
    store: S,
    config: FolioConfig,
}

impl<S: DataStore> FolioApi<S> {
    pub fn new(store: S, config: FolioConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &FolioConfig {
        &self.config
    }

    fn content_options(&self) -> ContentOptions {
        ContentOptions::from(&self.config)
    }

    // --- Selectors ---

    /// Resolves one selector among live records.
    pub fn resolve<T: Entity + query::Listable>(&self, input: &str) -> Result<Uuid> {
        let records: Vec<T> = self.store.list()?;
        selector::resolve(&records, input)
    }

    /// Resolves several selectors among live records.
    pub fn resolve_many<T, I>(&self, inputs: &[I]) -> Result<Vec<Uuid>>
    where
        T: Entity + query::Listable,
        I: AsRef<str>,
    {
        let records: Vec<T> = self.store.list()?;
        selector::resolve_all(&records, inputs)
    }

    /// Resolves several selectors among deleted records.
    pub fn resolve_deleted<T, I>(&self, inputs: &[I]) -> Result<Vec<Uuid>>
    where
        T: Entity + query::Listable,
        I: AsRef<str>,
    {
        let records: Vec<T> = self.store.list_deleted()?;
        selector::resolve_all(&records, inputs)
    }

    /// One page of deleted records of any collection.
    pub fn list_deleted<T>(&self, query: &ListQuery) -> Result<CmdResult<T>>
    where
        T: Entity + query::Listable,
    {
        let records: Vec<T> = self.store.list_deleted()?;
        Ok(CmdResult::default().with_listed(query::run(&records, query)))
    }

    fn for_each<T>(
        &mut self,
        ids: Vec<Uuid>,
        mut op: impl FnMut(&mut S, &Uuid) -> Result<CmdResult<T>>,
    ) -> Result<CmdResult<T>> {
        let mut result = CmdResult::default();
        let mut failures = Vec::new();
        for id in &ids {
            match op(&mut self.store, id) {
                Ok(done) => result.merge(done),
                Err(err) => {
                    tracing::warn!(%id, error = %err, "batch item failed");
                    failures.push(err);
                }
            }
        }
        if !failures.is_empty() && failures.len() == ids.len() {
            return Err(failures.swap_remove(0));
        }
        for err in failures {
            result.add_message(CmdMessage::error(err.to_string()));
        }
        Ok(result)
    }

    /// Orders category ids by depth in the whole hierarchy, live and deleted.
    fn by_depth(&self, mut ids: Vec<Uuid>, deepest_first: bool) -> Result<Vec<Uuid>> {
        let mut all: Vec<Category> = self.store.list()?;
        all.extend(self.store.list_deleted::<Category>()?);
        if deepest_first {
            ids.sort_by_key(|id| Reverse(categories::depth(&all, id)));
        } else {
            ids.sort_by_key(|id| categories::depth(&all, id));
        }
        Ok(ids)
    }

    // --- Default queries ---

    fn query_for(&self, sort: SortMode) -> ListQuery {
        ListQuery::new(sort, self.config.page_size)
    }

    pub fn article_query(&self) -> ListQuery {
        self.query_for(self.config.article_sort())
    }

    pub fn category_query(&self) -> ListQuery {
        self.query_for(self.config.category_sort())
    }

    pub fn album_query(&self) -> ListQuery {
        self.query_for(SortMode::DateDesc)
    }

    pub fn media_query(&self) -> ListQuery {
        self.query_for(SortMode::DateDesc)
    }

    pub fn tag_query(&self) -> ListQuery {
        self.query_for(self.config.tag_sort())
    }

    pub fn link_query(&self) -> ListQuery {
        self.query_for(self.config.link_sort())
    }

    /// Public feed queries use the site's posts-per-page setting.
    pub fn feed_query(&self) -> Result<ListQuery> {
        let settings = self.store.settings()?;
        Ok(ListQuery::new(SortMode::DateDesc, settings.posts_per_page))
    }

    // --- Articles ---

    pub fn create_article(&mut self, input: NewArticle) -> Result<CmdResult<Article>> {
        let options = self.content_options();
        articles::create(&mut self.store, input, &options, Utc::now())
    }

    pub fn update_article(
        &mut self,
        selector: &str,
        changes: ArticleUpdate,
    ) -> Result<CmdResult<Article>> {
        let id = self.resolve::<Article>(selector)?;
        let options = self.content_options();
        articles::update(&mut self.store, &id, changes, &options, Utc::now())
    }

    pub fn delete_articles<I: AsRef<str>>(&mut self, selectors: &[I]) -> Result<CmdResult<Article>> {
        let ids = self.resolve_many::<Article, I>(selectors)?;
        self.for_each(ids, |store, id| articles::delete(store, id))
    }

    pub fn restore_articles<I: AsRef<str>>(
        &mut self,
        selectors: &[I],
    ) -> Result<CmdResult<Article>> {
        let ids = self.resolve_deleted::<Article, I>(selectors)?;
        self.for_each(ids, |store, id| articles::restore(store, id))
    }

    pub fn get_article(&self, selector: &str) -> Result<Article> {
        let id = self.resolve::<Article>(selector)?;
        articles::get(&self.store, &id)
    }

    pub fn article_by_slug(&self, slug: &str) -> Result<Option<Article>> {
        articles::find_by_slug(&self.store, slug)
    }

    pub fn list_articles(&self, query: &ListQuery) -> Result<CmdResult<Article>> {
        articles::list(&self.store, query)
    }

    pub fn list_deleted_articles(&self, query: &ListQuery) -> Result<CmdResult<Article>> {
        articles::list_deleted(&self.store, query)
    }

    pub fn publish_due(&mut self) -> Result<CmdResult<Article>> {
        self.publish_due_at(Utc::now())
    }

    pub fn publish_due_at(&mut self, now: DateTime<Utc>) -> Result<CmdResult<Article>> {
        articles::publish_due(&mut self.store, now)
    }

    pub fn public_feed(&self, query: &ListQuery) -> Result<CmdResult<Article>> {
        articles::public_feed(&self.store, query, Utc::now())
    }

    // --- Categories ---

    pub fn create_category(&mut self, input: NewCategory) -> Result<CmdResult<Category>> {
        categories::create(&mut self.store, input)
    }

    pub fn update_category(
        &mut self,
        selector: &str,
        changes: CategoryUpdate,
    ) -> Result<CmdResult<Category>> {
        let id = self.resolve::<Category>(selector)?;
        categories::update(&mut self.store, &id, changes)
    }

    pub fn delete_categories<I: AsRef<str>>(
        &mut self,
        selectors: &[I],
    ) -> Result<CmdResult<Category>> {
        let ids = self.resolve_many::<Category, I>(selectors)?;
        let ids = self.by_depth(ids, true)?;
        self.for_each(ids, |store, id| categories::delete(store, id))
    }

    pub fn restore_categories<I: AsRef<str>>(
        &mut self,
        selectors: &[I],
    ) -> Result<CmdResult<Category>> {
        let ids = self.resolve_deleted::<Category, I>(selectors)?;
        let ids = self.by_depth(ids, false)?;
        self.for_each(ids, |store, id| categories::restore(store, id))
    }

    pub fn list_categories(&self, query: &ListQuery) -> Result<CmdResult<Category>> {
        categories::list(&self.store, query)
    }

    pub fn reorder_categories<I: AsRef<str>>(
        &mut self,
        selectors: &[I],
    ) -> Result<CmdResult<Category>> {
        let ids = self.resolve_many::<Category, I>(selectors)?;
        categories::reorder(&mut self.store, &ids)
    }

    pub fn category_tree(&self, kind: Option<CategoryKind>) -> Result<Vec<CategoryNode>> {
        categories::tree(&self.store, kind)
    }

    // --- Albums ---

    pub fn create_album(&mut self, input: NewAlbum) -> Result<CmdResult<Album>> {
        albums::create(&mut self.store, input)
    }

    pub fn update_album(&mut self, selector: &str, changes: AlbumUpdate) -> Result<CmdResult<Album>> {
        let id = self.resolve::<Album>(selector)?;
        albums::update(&mut self.store, &id, changes)
    }

    pub fn delete_albums<I: AsRef<str>>(&mut self, selectors: &[I]) -> Result<CmdResult<Album>> {
        let ids = self.resolve_many::<Album, I>(selectors)?;
        self.for_each(ids, |store, id| albums::delete(store, id))
    }

    pub fn restore_albums<I: AsRef<str>>(&mut self, selectors: &[I]) -> Result<CmdResult<Album>> {
        let ids = self.resolve_deleted::<Album, I>(selectors)?;
        self.for_each(ids, |store, id| albums::restore(store, id))
    }

    pub fn list_albums(&self, query: &ListQuery) -> Result<CmdResult<Album>> {
        albums::list(&self.store, query)
    }

    pub fn add_album_media<I: AsRef<str>>(
        &mut self,
        album: &str,
        media: &[I],
    ) -> Result<CmdResult<Album>> {
        let id = self.resolve::<Album>(album)?;
        let media_ids = self.resolve_many::<Media, I>(media)?;
        albums::add_media(&mut self.store, &id, &media_ids)
    }

    /// Media may already be deleted when it is taken out of a gallery, so
    /// selectors resolve among live and deleted media alike.
    pub fn remove_album_media<I: AsRef<str>>(
        &mut self,
        album: &str,
        media: &[I],
    ) -> Result<CmdResult<Album>> {
        let id = self.resolve::<Album>(album)?;
        let mut candidates: Vec<Media> = self.store.list()?;
        candidates.extend(self.store.list_deleted::<Media>()?);
        let media_ids = selector::resolve_all(&candidates, media)?;
        albums::remove_media(&mut self.store, &id, &media_ids)
    }

    pub fn reorder_album_media<I: AsRef<str>>(
        &mut self,
        album: &str,
        media: &[I],
    ) -> Result<CmdResult<Album>> {
        let id = self.resolve::<Album>(album)?;
        let media_ids = self.resolve_many::<Media, I>(media)?;
        albums::reorder_media(&mut self.store, &id, &media_ids)
    }

    // --- Media ---

    pub fn register_media(&mut self, input: NewMedia) -> Result<CmdResult<Media>> {
        media::register(&mut self.store, input)
    }

    pub fn update_media(&mut self, selector: &str, changes: MediaUpdate) -> Result<CmdResult<Media>> {
        let id = self.resolve::<Media>(selector)?;
        media::update(&mut self.store, &id, changes)
    }

    pub fn delete_media<I: AsRef<str>>(&mut self, selectors: &[I]) -> Result<CmdResult<Media>> {
        let ids = self.resolve_many::<Media, I>(selectors)?;
        self.for_each(ids, |store, id| media::delete(store, id))
    }

    pub fn restore_media<I: AsRef<str>>(&mut self, selectors: &[I]) -> Result<CmdResult<Media>> {
        let ids = self.resolve_deleted::<Media, I>(selectors)?;
        self.for_each(ids, |store, id| media::restore(store, id))
    }

    pub fn list_media(&self, query: &ListQuery) -> Result<CmdResult<Media>> {
        media::list(&self.store, query)
    }

    // --- Tags ---

    pub fn create_tag(&mut self, name: &str, slug: Option<&str>) -> Result<CmdResult<Tag>> {
        tags::create(&mut self.store, name, slug)
    }

    pub fn ensure_tags(&mut self, names: &[String]) -> Result<CmdResult<Tag>> {
        tags::ensure(&mut self.store, names)
    }

    pub fn rename_tag(&mut self, selector: &str, name: &str) -> Result<CmdResult<Tag>> {
        let id = self.resolve::<Tag>(selector)?;
        tags::rename(&mut self.store, &id, name)
    }

    pub fn delete_tags<I: AsRef<str>>(&mut self, selectors: &[I]) -> Result<CmdResult<Tag>> {
        let ids = self.resolve_many::<Tag, I>(selectors)?;
        self.for_each(ids, |store, id| tags::delete(store, id))
    }

    pub fn restore_tags<I: AsRef<str>>(&mut self, selectors: &[I]) -> Result<CmdResult<Tag>> {
        let ids = self.resolve_deleted::<Tag, I>(selectors)?;
        self.for_each(ids, |store, id| tags::restore(store, id))
    }

    pub fn list_tags(&self, query: &ListQuery) -> Result<CmdResult<Tag>> {
        tags::list(&self.store, query)
    }

    pub fn recount_tags(&mut self) -> Result<CmdResult<Tag>> {
        tags::recount(&mut self.store)
    }

    // --- Links ---

    pub fn create_link(&mut self, input: NewLink) -> Result<CmdResult<Link>> {
        links::create(&mut self.store, input)
    }

    pub fn update_link(&mut self, selector: &str, changes: LinkUpdate) -> Result<CmdResult<Link>> {
        let id = self.resolve::<Link>(selector)?;
        links::update(&mut self.store, &id, changes)
    }

    pub fn toggle_links<I: AsRef<str>>(&mut self, selectors: &[I]) -> Result<CmdResult<Link>> {
        let ids = self.resolve_many::<Link, I>(selectors)?;
        self.for_each(ids, |store, id| links::toggle_active(store, id))
    }

    pub fn reorder_links<I: AsRef<str>>(
        &mut self,
        kind: LinkKind,
        selectors: &[I],
    ) -> Result<CmdResult<Link>> {
        let ids = self.resolve_many::<Link, I>(selectors)?;
        links::reorder(&mut self.store, kind, &ids)
    }

    pub fn delete_links<I: AsRef<str>>(&mut self, selectors: &[I]) -> Result<CmdResult<Link>> {
        let ids = self.resolve_many::<Link, I>(selectors)?;
        self.for_each(ids, |store, id| links::delete(store, id))
    }

    pub fn restore_links<I: AsRef<str>>(&mut self, selectors: &[I]) -> Result<CmdResult<Link>> {
        let ids = self.resolve_deleted::<Link, I>(selectors)?;
        self.for_each(ids, |store, id| links::restore(store, id))
    }

    pub fn list_links(&self, query: &ListQuery) -> Result<CmdResult<Link>> {
        links::list(&self.store, query)
    }

    pub fn link_hub(&self) -> Result<LinkHub> {
        links::hub(&self.store)
    }

    // --- Settings ---

    pub fn settings(&self) -> Result<SiteSettings> {
        settings::show(&self.store)
    }

    pub fn update_settings(&mut self, changes: SettingsUpdate) -> Result<CmdResult<SiteSettings>> {
        settings::update(&mut self.store, changes)
    }

    // --- Ad-hoc JSON ---

    /// Runs `query` over a JSON array of arbitrary records.
    pub fn query_json(
        &self,
        json: &str,
        fields: RecordFields,
        query: &ListQuery,
    ) -> Result<QueryPage<JsonRecord>> {
        let records = parse_records(json, fields)?;
        Ok(query::run(&records, query))
    }
}
