//! # List Query Engine
//!
//! Every admin listing (articles, categories, albums, tags, links...) is the
//! same pipeline over a collection that is already fully loaded in memory:
//!
//! ```text
//! records ──► filter (search AND attribute filters) ──► sort ──► paginate ──► QueryPage
//! ```
//!
//! [`run`] is a pure function of its inputs. It never mutates the records it is
//! given and keeps no state between calls; every stage allocates a fresh
//! collection. Recomputing the whole pipeline on every keystroke is fine for
//! the dozens-to-hundreds of records a content site holds, and nothing here
//! tries to be incremental.
//!
//! The engine is generic over [`Listable`], the accessor trait each record
//! type implements once. [`record::JsonRecord`] implements it for arbitrary
//! JSON objects.
//!
//! The mutable side (what the user typed, which filter is selected, which page
//! is showing) lives in [`ListQuery`]. Its setters encode the reset rule: any
//! change to search, filters, sort or page size goes back to page 1.

pub mod filter;
pub mod paginate;
pub mod record;
pub mod sort;
mod value;

use chrono::{DateTime, Utc};
use serde::Serialize;

pub use filter::{AttrFilter, FilterChoice, FilterOp, ALL};
pub use sort::SortMode;
pub use value::AttrValue;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Accessors the engine needs from a record.
pub trait Listable {
    /// Text used by the alphabetical comparators.
    fn label(&self) -> &str;

    /// Fields the search term is matched against.
    fn search_fields(&self) -> Vec<&str>;

    /// Date used by the date comparators. `None` sorts as the epoch.
    fn timestamp(&self) -> Option<DateTime<Utc>>;

    /// Manual position used by the order comparators.
    fn order(&self) -> i64 {
        0
    }

    /// Named attribute for equality/membership filters.
    fn attr(&self, name: &str) -> Option<AttrValue>;
}

/// Search, filter, sort and page selection for one listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    search: String,
    filters: Vec<AttrFilter>,
    sort: SortMode,
    page: usize,
    page_size: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            filters: Vec::new(),
            sort: SortMode::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ListQuery {
    pub fn new(sort: SortMode, page_size: usize) -> Self {
        Self {
            sort,
            page_size: page_size.max(1),
            ..Self::default()
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn filters(&self) -> &[AttrFilter] {
        &self.filters
    }

    pub fn sort(&self) -> SortMode {
        self.sort
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        let term = term.into();
        if term != self.search {
            self.search = term;
            self.page = 1;
        }
    }

    /// Sets (or replaces) the filter on `filter.attr`.
    pub fn set_filter(&mut self, filter: AttrFilter) {
        match self.filters.iter().position(|f| f.attr == filter.attr) {
            Some(pos) if self.filters[pos] == filter => return,
            Some(pos) => self.filters[pos] = filter,
            None => self.filters.push(filter),
        }
        self.page = 1;
    }

    pub fn clear_filters(&mut self) {
        if !self.filters.is_empty() {
            self.filters.clear();
            self.page = 1;
        }
    }

    pub fn set_sort(&mut self, sort: SortMode) {
        if sort != self.sort {
            self.sort = sort;
            self.page = 1;
        }
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        let page_size = page_size.max(1);
        if page_size != self.page_size {
            self.page_size = page_size;
            self.page = 1;
        }
    }

    /// Moves to `page`. Out-of-range pages are allowed and render empty.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.set_search(term);
        self
    }

    pub fn with_filter(mut self, filter: AttrFilter) -> Self {
        self.set_filter(filter);
        self
    }

    pub fn with_sort(mut self, sort: SortMode) -> Self {
        self.set_sort(sort);
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.set_page_size(page_size);
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.set_page(page);
        self
    }
}

/// One rendered page of a listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryPage<T> {
    pub items: Vec<T>,
    pub total_filtered: usize,
    pub total_pages: usize,
    pub page: usize,
    pub page_size: usize,
}

impl<T> QueryPage<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Converts the page items, keeping the counts.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> QueryPage<U> {
        QueryPage {
            items: self.items.into_iter().map(f).collect(),
            total_filtered: self.total_filtered,
            total_pages: self.total_pages,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

/// Filters, sorts and paginates `records` according to `query`.
pub fn run<T: Listable + Clone>(records: &[T], query: &ListQuery) -> QueryPage<T> {
    let filtered = filter::apply(records, &query.search, &query.filters);
    let total_filtered = filtered.len();
    let ordered = sort::sorted(&filtered, query.sort);
    let items = paginate::page_slice(&ordered, query.page, query.page_size);

    tracing::debug!(
        total = records.len(),
        filtered = total_filtered,
        page = query.page,
        sort = %query.sort,
        "list query"
    );

    QueryPage {
        items,
        total_filtered,
        total_pages: paginate::total_pages(total_filtered, query.page_size),
        page: query.page,
        page_size: query.page_size,
    }
}

/// Filters and sorts without paginating.
pub fn run_all<T: Listable + Clone>(records: &[T], query: &ListQuery) -> Vec<T> {
    let filtered = filter::apply(records, &query.search, &query.filters);
    sort::sorted(&filtered, query.sort)
}
