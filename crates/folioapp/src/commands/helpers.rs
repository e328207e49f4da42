use crate::error::{FolioError, Result};
use crate::model::{Category, Media, Tag};
use crate::store::DataStore;
use crate::text::{slugify, unique_slug};
use uuid::Uuid;

/// Trims `value` and rejects it when empty.
pub fn require_text(value: &str, field: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FolioError::validation(format!("{} cannot be empty", field)));
    }
    Ok(trimmed.to_string())
}

/// Picks the slug for a record.
///
/// An explicit slug is normalised and must not be `taken`. Without one, the
/// slug is derived from `source` and suffixed (`-2`, `-3`...) until free.
pub fn resolve_slug(requested: Option<&str>, source: &str, taken: &[String]) -> Result<String> {
    let is_taken = |candidate: &str| taken.iter().any(|s| s == candidate);

    match requested {
        Some(raw) => {
            let slug = slugify(raw);
            if slug.is_empty() {
                return Err(FolioError::validation(format!("Invalid slug: {:?}", raw)));
            }
            if is_taken(&slug) {
                return Err(FolioError::validation(format!(
                    "Slug already in use: {}",
                    slug
                )));
            }
            Ok(slug)
        }
        None => {
            let base = slugify(source);
            if base.is_empty() {
                return Err(FolioError::validation(format!(
                    "Cannot derive a slug from {:?}",
                    source
                )));
            }
            Ok(unique_slug(&base, is_taken))
        }
    }
}

/// Loads a live category, checking it may hold articles (or albums).
pub fn require_category<S: DataStore>(
    store: &S,
    id: &Uuid,
    for_articles: bool,
) -> Result<Category> {
    let category: Category = store.get(id)?;
    let accepted = if for_articles {
        category.kind.accepts_articles()
    } else {
        category.kind.accepts_albums()
    };
    if !accepted {
        return Err(FolioError::validation(format!(
            "Category \"{}\" is for {} content",
            category.name, category.kind
        )));
    }
    Ok(category)
}

/// Checks every id not already in `kept` is a live tag. Returns the ids
/// deduplicated, first occurrence kept.
pub fn require_tags<S: DataStore>(store: &S, ids: &[Uuid], kept: &[Uuid]) -> Result<Vec<Uuid>> {
    let tags: Vec<Tag> = store.list()?;
    let mut unique = Vec::with_capacity(ids.len());
    for id in ids {
        if !kept.contains(id) && !tags.iter().any(|t| t.id == *id) {
            return Err(FolioError::NotFound { kind: "Tag", id: *id });
        }
        if !unique.contains(id) {
            unique.push(*id);
        }
    }
    Ok(unique)
}

/// Checks every id not already in `kept` is live media. Duplicates are
/// rejected since a gallery shows each item once.
pub fn require_media<S: DataStore>(store: &S, ids: &[Uuid], kept: &[Uuid]) -> Result<()> {
    let media: Vec<Media> = store.list()?;
    for (pos, id) in ids.iter().enumerate() {
        if !kept.contains(id) && !media.iter().any(|m| m.id == *id) {
            return Err(FolioError::NotFound {
                kind: "Media",
                id: *id,
            });
        }
        if ids[..pos].contains(id) {
            return Err(FolioError::validation(format!("Duplicate media id: {}", id)));
        }
    }
    Ok(())
}

/// Next manual position: one past the current maximum, 1 for an empty list.
pub fn next_order(orders: impl IntoIterator<Item = i64>) -> i64 {
    orders.into_iter().max().map(|max| max + 1).unwrap_or(1)
}

/// Ids that are in `new` but not `old`, and in `old` but not `new`.
pub fn diff_ids(old: &[Uuid], new: &[Uuid]) -> (Vec<Uuid>, Vec<Uuid>) {
    let added = new.iter().filter(|id| !old.contains(id)).copied().collect();
    let removed = old.iter().filter(|id| !new.contains(id)).copied().collect();
    (added, removed)
}

/// Moves `ids` to the front of a manually ordered list, in the given order,
/// then renumbers everything 1..=n. Records not named keep their relative
/// order after the named ones, so `records` must arrive in their current
/// manual order. Returns the records whose position changed.
pub fn reorder_by<T: Clone>(
    mut records: Vec<T>,
    ids: &[Uuid],
    id_of: impl Fn(&T) -> Uuid,
    order: impl Fn(&mut T) -> &mut i64,
) -> Result<Vec<T>> {
    for (pos, id) in ids.iter().enumerate() {
        if ids[..pos].contains(id) {
            return Err(FolioError::validation(format!("Duplicate id in order: {}", id)));
        }
        if !records.iter().any(|r| id_of(r) == *id) {
            return Err(FolioError::validation(format!("Unknown id in order: {}", id)));
        }
    }

    records.sort_by_key(|r| {
        let named = ids.iter().position(|id| *id == id_of(r));
        (named.is_none(), named.unwrap_or(0))
    });

    let mut changed = Vec::new();
    for (pos, record) in records.iter_mut().enumerate() {
        let next = pos as i64 + 1;
        let slot = order(record);
        if *slot != next {
            *slot = next;
            changed.push(record.clone());
        }
    }
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CategoryKind;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn require_text_trims() {
        assert_eq!(require_text("  Hi ", "Title").unwrap(), "Hi");
        assert!(require_text("   ", "Title").is_err());
    }

    #[test]
    fn slug_is_derived_and_made_unique() {
        let taken = vec!["hello-world".to_string()];
        assert_eq!(resolve_slug(None, "Hello World", &[]).unwrap(), "hello-world");
        assert_eq!(
            resolve_slug(None, "Hello World", &taken).unwrap(),
            "hello-world-2"
        );
    }

    #[test]
    fn explicit_slug_must_be_free() {
        let taken = vec!["about".to_string()];
        assert!(resolve_slug(Some("About"), "whatever", &taken).is_err());
        assert_eq!(
            resolve_slug(Some("About Me"), "whatever", &taken).unwrap(),
            "about-me"
        );
        assert!(resolve_slug(Some("???"), "whatever", &[]).is_err());
    }

    #[test]
    fn underivable_slug_is_rejected() {
        assert!(resolve_slug(None, "!!!", &[]).is_err());
    }

    #[test]
    fn category_kind_is_checked() {
        let fixture = StoreFixture::new()
            .with_category("Photos", CategoryKind::Album)
            .with_category("Posts", CategoryKind::Article);
        let photos = fixture.id_of::<Category>("Photos");
        let posts = fixture.id_of::<Category>("Posts");

        assert!(require_category(&fixture.store, &photos, true).is_err());
        assert!(require_category(&fixture.store, &photos, false).is_ok());
        assert!(require_category(&fixture.store, &posts, true).is_ok());
        assert!(require_category(&fixture.store, &Uuid::new_v4(), true).is_err());
    }

    #[test]
    fn tags_are_deduplicated() {
        let fixture = StoreFixture::new().with_tag("rust").with_tag("web");
        let rust = fixture.id_of::<Tag>("rust");
        let web = fixture.id_of::<Tag>("web");
        assert_eq!(
            require_tags(&fixture.store, &[rust, web, rust], &[]).unwrap(),
            vec![rust, web]
        );
        assert!(require_tags(&fixture.store, &[Uuid::new_v4()], &[]).is_err());
    }

    #[test]
    fn kept_ids_skip_the_tag_check() {
        let fixture = StoreFixture::new().with_tag("rust");
        let rust = fixture.id_of::<Tag>("rust");
        let gone = Uuid::new_v4();
        assert_eq!(
            require_tags(&fixture.store, &[gone, rust], &[gone]).unwrap(),
            vec![gone, rust]
        );
        assert!(require_tags(&fixture.store, &[gone], &[rust]).is_err());
    }

    #[test]
    fn media_duplicates_rejected() {
        let fixture = StoreFixture::new().with_media("a.png");
        let a = fixture.id_of::<Media>("a.png");
        assert!(require_media(&fixture.store, &[a], &[]).is_ok());
        assert!(require_media(&fixture.store, &[a, a], &[]).is_err());
    }

    #[test]
    fn next_order_is_max_plus_one() {
        assert_eq!(next_order(Vec::new()), 1);
        assert_eq!(next_order(vec![3, 1, 7]), 8);
    }

    #[test]
    fn reorder_moves_named_ids_first() {
        #[derive(Clone, Debug)]
        struct Row {
            id: Uuid,
            order: i64,
        }
        let rows: Vec<Row> = (1..=4).map(|order| Row { id: Uuid::new_v4(), order }).collect();
        let (a, c) = (rows[0].id, rows[2].id);

        let changed = reorder_by(rows.clone(), &[c, a], |r| r.id, |r| &mut r.order).unwrap();
        // c: 3 -> 1, a: 1 -> 2, b: 2 -> 3, d stays 4
        assert_eq!(changed.len(), 3);
        assert_eq!(changed.iter().find(|r| r.id == c).map(|r| r.order), Some(1));

        assert!(reorder_by(rows.clone(), &[a, a], |r| r.id, |r| &mut r.order).is_err());
        assert!(reorder_by(rows, &[Uuid::new_v4()], |r| r.id, |r| &mut r.order).is_err());
    }

    #[test]
    fn diff_ids_splits_added_and_removed() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let (added, removed) = diff_ids(&[a, b], &[b, c]);
        assert_eq!(added, vec![c]);
        assert_eq!(removed, vec![a]);
    }
}
