use super::content_store::ContentStore;
use super::mem_backend::MemBackend;

pub type InMemoryStore = ContentStore<MemBackend>;

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        ContentStore::with_backend(MemBackend::new())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{
        Article, ArticleStatus, Category, CategoryKind, Link, LinkKind, Media, Tag,
    };
    use crate::store::DataStore;
    use crate::text::slugify;
    use chrono::{Duration, Utc};

    /// Builds a store with raw records, bypassing command validation.
    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        /// `count` drafts titled "Article 1".."Article N", each a day older
        /// than the previous.
        pub fn with_articles(mut self, count: usize) -> Self {
            let now = Utc::now();
            for i in 0..count {
                let title = format!("Article {}", i + 1);
                let mut article = Article::new(
                    title.clone(),
                    slugify(&title),
                    format!("Content for article {}", i + 1),
                );
                article.created_at = now - Duration::days(i as i64);
                self.store.save(&article).unwrap();
            }
            self
        }

        pub fn with_article(mut self, title: &str, status: ArticleStatus) -> Self {
            let mut article = Article::new(title.to_string(), slugify(title), String::new());
            article.status = status;
            if status == ArticleStatus::Published {
                article.published_at = Some(Utc::now());
            }
            self.store.save(&article).unwrap();
            self
        }

        pub fn with_deleted_article(mut self, title: &str) -> Self {
            let mut article = Article::new(title.to_string(), slugify(title), String::new());
            article.deleted = true;
            self.store.save(&article).unwrap();
            self
        }

        pub fn with_category(mut self, name: &str, kind: CategoryKind) -> Self {
            let order = self.store.list::<Category>().unwrap().len() as i64 + 1;
            let mut category = Category::new(name.to_string(), slugify(name), kind);
            category.order = order;
            self.store.save(&category).unwrap();
            self
        }

        /// A category of kind both under the live category named `parent`.
        pub fn with_child_category(mut self, name: &str, parent: &str) -> Self {
            let parent_id = self.id_of::<Category>(parent);
            let order = self.store.list::<Category>().unwrap().len() as i64 + 1;
            let mut category = Category::new(name.to_string(), slugify(name), CategoryKind::Both);
            category.order = order;
            category.parent_id = Some(parent_id);
            self.store.save(&category).unwrap();
            self
        }

        pub fn with_tag(mut self, name: &str) -> Self {
            self.store
                .save(&Tag::new(name.to_string(), slugify(name)))
                .unwrap();
            self
        }

        pub fn with_media(mut self, file_name: &str) -> Self {
            self.store
                .save(&Media::new(file_name.to_string()))
                .unwrap();
            self
        }

        pub fn with_link(mut self, title: &str, kind: LinkKind, active: bool) -> Self {
            let order = self.store.list::<Link>().unwrap().len() as i64 + 1;
            let mut link = Link::new(
                title.to_string(),
                format!("https://example.com/{}", slugify(title)),
                kind,
            );
            link.order = order;
            link.active = active;
            self.store.save(&link).unwrap();
            self
        }

        /// Looks up a live record id by label.
        pub fn id_of<T>(&self, label: &str) -> uuid::Uuid
        where
            T: crate::model::Entity + crate::query::Listable,
        {
            self.store
                .list::<T>()
                .unwrap()
                .into_iter()
                .find(|r| r.label() == label)
                .map(|r| r.id())
                .unwrap_or_else(|| panic!("no {} labelled {}", T::KIND, label))
        }
    }
}
