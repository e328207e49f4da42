//! Attribute values exposed by listable records for filtering.

use std::fmt;
use uuid::Uuid;

/// Runtime representation of a filterable attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    /// Flags such as `featured` or `active`.
    Bool(bool),

    /// Closed-vocabulary values such as `status` or `type`, stored by key.
    Enum(String),

    /// Open sets such as tags.
    List(Vec<String>),

    /// Optional reference to another record (`category`, `parent`).
    Ref(Option<Uuid>),
}

impl AttrValue {
    /// Parses a filter choice as typed on the command line or sent by a UI.
    ///
    /// Booleans and UUIDs are recognised, `none` means an empty reference and
    /// anything else is an enum key.
    pub fn parse_choice(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "true" => return AttrValue::Bool(true),
            "false" => return AttrValue::Bool(false),
            "none" | "null" => return AttrValue::Ref(None),
            _ => {}
        }
        match Uuid::parse_str(trimmed) {
            Ok(id) => AttrValue::Ref(Some(id)),
            Err(_) => AttrValue::Enum(trimmed.to_string()),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&str> {
        match self {
            AttrValue::Enum(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            AttrValue::List(v) => Some(v),
            _ => None,
        }
    }

    /// Loose equality used by equality predicates.
    ///
    /// Enum keys compare case-insensitively. A reference compares equal to an
    /// enum holding its UUID text, so values read from JSON records still match.
    pub fn loosely_equals(&self, other: &AttrValue) -> bool {
        match (self, other) {
            (AttrValue::Bool(a), AttrValue::Bool(b)) => a == b,
            (AttrValue::Enum(a), AttrValue::Enum(b)) => a.eq_ignore_ascii_case(b),
            (AttrValue::List(a), AttrValue::List(b)) => a == b,
            (AttrValue::Ref(a), AttrValue::Ref(b)) => a == b,
            (AttrValue::Ref(Some(id)), AttrValue::Enum(s))
            | (AttrValue::Enum(s), AttrValue::Ref(Some(id))) => {
                Uuid::parse_str(s).map(|parsed| parsed == *id).unwrap_or(false)
            }
            _ => false,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Bool(v) => write!(f, "{}", v),
            AttrValue::Enum(s) => f.write_str(s),
            AttrValue::List(items) => write!(f, "[{}]", items.join(", ")),
            AttrValue::Ref(Some(id)) => write!(f, "{}", id),
            AttrValue::Ref(None) => f.write_str("none"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_choice_recognises_types() {
        assert_eq!(AttrValue::parse_choice("true"), AttrValue::Bool(true));
        assert_eq!(AttrValue::parse_choice("FALSE"), AttrValue::Bool(false));
        assert_eq!(AttrValue::parse_choice("none"), AttrValue::Ref(None));
        assert_eq!(
            AttrValue::parse_choice(" published "),
            AttrValue::Enum("published".into())
        );

        let id = Uuid::new_v4();
        assert_eq!(
            AttrValue::parse_choice(&id.to_string()),
            AttrValue::Ref(Some(id))
        );
    }

    #[test]
    fn enum_equality_ignores_case() {
        let a = AttrValue::Enum("Published".into());
        let b = AttrValue::Enum("published".into());
        assert!(a.loosely_equals(&b));
    }

    #[test]
    fn ref_matches_uuid_text() {
        let id = Uuid::new_v4();
        let r = AttrValue::Ref(Some(id));
        assert!(r.loosely_equals(&AttrValue::Enum(id.to_string())));
        assert!(!r.loosely_equals(&AttrValue::Enum("other".into())));
        assert!(!AttrValue::Ref(None).loosely_equals(&AttrValue::Enum("none".into())));
    }

    #[test]
    fn type_mismatch_is_not_equal() {
        assert!(!AttrValue::Bool(true).loosely_equals(&AttrValue::Enum("true".into())));
    }
}
