//! # Record Selectors
//!
//! UIs refer to records with whatever the user typed. A selector is resolved
//! against a list of candidate records in this order:
//!
//! 1. **Full UUID**: `1f0c9a3e-...`
//! 2. **UUID prefix**: at least [`MIN_PREFIX`] hex characters, e.g. `1f0c9a`
//! 3. **Label or slug**: case-insensitive exact match on the record label or
//!    any of its search fields (which include the slug)
//!
//! A selector matching more than one record is an error, never a guess.
//! Callers choose the candidates, so the same selector can be resolved among
//! live records or among deleted ones.

use crate::error::{FolioError, Result};
use crate::model::Entity;
use crate::query::Listable;
use uuid::Uuid;

pub const MIN_PREFIX: usize = 4;

fn looks_like_prefix(raw: &str) -> bool {
    raw.len() >= MIN_PREFIX && raw.chars().all(|c| c.is_ascii_hexdigit() || c == '-')
}

fn single<T: Entity>(matches: Vec<&T>, raw: &str) -> Result<Option<Uuid>> {
    match matches.len() {
        0 => Ok(None),
        1 => Ok(Some(matches[0].id())),
        count => Err(FolioError::Ambiguous {
            kind: T::KIND,
            reference: raw.to_string(),
            count,
        }),
    }
}

/// Resolves one selector among `records`.
pub fn resolve<T: Entity + Listable>(records: &[T], raw: &str) -> Result<Uuid> {
    let raw = raw.trim();

    if let Ok(id) = Uuid::parse_str(raw) {
        return records
            .iter()
            .find(|r| r.id() == id)
            .map(|r| r.id())
            .ok_or(FolioError::NotFound { kind: T::KIND, id });
    }

    if looks_like_prefix(raw) {
        let prefix = raw.to_ascii_lowercase();
        let by_prefix: Vec<&T> = records
            .iter()
            .filter(|r| r.id().to_string().starts_with(&prefix))
            .collect();
        if let Some(id) = single(by_prefix, raw)? {
            return Ok(id);
        }
    }

    let wanted = raw.to_lowercase();
    let by_name: Vec<&T> = records
        .iter()
        .filter(|r| {
            r.label().to_lowercase() == wanted
                || r.search_fields().iter().any(|f| f.to_lowercase() == wanted)
        })
        .collect();

    single(by_name, raw)?.ok_or_else(|| FolioError::NoMatch {
        kind: T::KIND,
        reference: raw.to_string(),
    })
}

/// Resolves several selectors, dropping duplicates but keeping order.
pub fn resolve_all<T, I>(records: &[T], inputs: &[I]) -> Result<Vec<Uuid>>
where
    T: Entity + Listable,
    I: AsRef<str>,
{
    let mut ids = Vec::with_capacity(inputs.len());
    for input in inputs {
        let id = resolve(records, input.as_ref())?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Article, Tag};

    fn articles() -> Vec<Article> {
        vec![
            Article::new("Hello World".into(), "hello-world".into(), String::new()),
            Article::new("Second Post".into(), "second".into(), String::new()),
        ]
    }

    #[test]
    fn resolves_full_uuid() {
        let records = articles();
        let id = records[1].id;
        assert_eq!(resolve(&records, &id.to_string()).unwrap(), id);
        assert!(matches!(
            resolve(&records, &Uuid::new_v4().to_string()),
            Err(FolioError::NotFound { .. })
        ));
    }

    #[test]
    fn resolves_prefix() {
        let records = articles();
        let id = records[0].id;
        let prefix = &id.to_string()[..8];
        assert_eq!(resolve(&records, prefix).unwrap(), id);
    }

    #[test]
    fn resolves_label_and_slug_case_insensitively() {
        let records = articles();
        assert_eq!(resolve(&records, "hello world").unwrap(), records[0].id);
        assert_eq!(resolve(&records, "SECOND").unwrap(), records[1].id);
        assert!(matches!(
            resolve(&records, "nope"),
            Err(FolioError::NoMatch { kind: "Article", .. })
        ));
    }

    #[test]
    fn ambiguous_names_are_errors() {
        let records = vec![
            Tag::new("Rust".into(), "rust".into()),
            Tag::new("rust".into(), "rust-2".into()),
        ];
        assert!(matches!(
            resolve(&records, "rust"),
            Err(FolioError::Ambiguous { count: 2, .. })
        ));
        assert_eq!(resolve(&records, "rust-2").unwrap(), records[1].id);
    }

    #[test]
    fn hex_looking_names_fall_back_to_labels() {
        let records = vec![Tag::new("cafe".into(), "cafe".into())];
        assert_eq!(resolve(&records, "cafe").unwrap(), records[0].id);
    }

    #[test]
    fn resolve_all_dedupes() {
        let records = articles();
        let ids = resolve_all(&records, &["second", "hello-world", "Second Post"]).unwrap();
        assert_eq!(ids, vec![records[1].id, records[0].id]);
    }
}
