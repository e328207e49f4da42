//! Filter predicates.
//!
//! A record survives filtering when it matches the search term AND every active
//! attribute filter. There is no OR, grouping or negation.

use super::{AttrValue, Listable};

/// The choice that disables an attribute filter.
pub const ALL: &str = "all";

/// Filter operation for comparing attribute values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// Exact (loose) equality.
    Eq,
    /// List attribute contains the value.
    Contains,
}

/// The selected value of a filter control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChoice {
    /// The `"all"` sentinel: always matches.
    All,
    Value(AttrValue),
}

/// A filter condition on a named attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrFilter {
    pub attr: String,
    pub op: FilterOp,
    pub choice: FilterChoice,
}

impl AttrFilter {
    pub fn new(attr: impl Into<String>, op: FilterOp, choice: FilterChoice) -> Self {
        Self {
            attr: attr.into(),
            op,
            choice,
        }
    }

    pub fn eq(attr: impl Into<String>, value: AttrValue) -> Self {
        Self::new(attr, FilterOp::Eq, FilterChoice::Value(value))
    }

    pub fn contains(attr: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(
            attr,
            FilterOp::Contains,
            FilterChoice::Value(AttrValue::Enum(value.into())),
        )
    }

    /// Builds an equality filter from a raw choice, honouring the `"all"` sentinel.
    pub fn choice(attr: impl Into<String>, raw: &str) -> Self {
        let choice = if raw.trim().eq_ignore_ascii_case(ALL) {
            FilterChoice::All
        } else {
            FilterChoice::Value(AttrValue::parse_choice(raw))
        };
        Self::new(attr, FilterOp::Eq, choice)
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.choice, FilterChoice::All)
    }

    /// A record without the attribute never matches an active filter.
    pub fn matches<T: Listable + ?Sized>(&self, item: &T) -> bool {
        let FilterChoice::Value(expected) = &self.choice else {
            return true;
        };
        let Some(actual) = item.attr(&self.attr) else {
            return false;
        };

        match self.op {
            FilterOp::Eq => actual.loosely_equals(expected),
            FilterOp::Contains => match (&actual, expected) {
                (AttrValue::List(items), AttrValue::Enum(wanted)) => {
                    items.iter().any(|item| item.eq_ignore_ascii_case(wanted))
                }
                (AttrValue::List(items), AttrValue::Ref(Some(id))) => {
                    let wanted = id.to_string();
                    items.iter().any(|item| item.eq_ignore_ascii_case(&wanted))
                }
                _ => actual.loosely_equals(expected),
            },
        }
    }
}

/// Case-insensitive substring match over the record's search fields.
///
/// `term_lower` must already be lowercased; an empty term matches everything.
pub fn matches_search<T: Listable + ?Sized>(item: &T, term_lower: &str) -> bool {
    if term_lower.is_empty() {
        return true;
    }
    item.search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(term_lower))
}

/// Applies search then attribute filters, returning fresh clones of survivors.
pub fn apply<T: Listable + Clone>(items: &[T], search: &str, filters: &[AttrFilter]) -> Vec<T> {
    let term_lower = search.trim().to_lowercase();
    let active: Vec<&AttrFilter> = filters.iter().filter(|f| f.is_active()).collect();

    items
        .iter()
        .filter(|item| matches_search(*item, &term_lower))
        .filter(|item| active.iter().all(|f| f.matches(*item)))
        .cloned()
        .collect()
}
