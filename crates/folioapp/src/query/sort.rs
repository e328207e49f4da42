//! Comparator registry.
//!
//! Each [`SortMode`] names one comparator. Sorting is always stable, so records
//! that compare equal keep their input order.

use super::Listable;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SortMode {
    #[serde(rename = "az-asc")]
    AzAsc,
    #[serde(rename = "az-desc")]
    AzDesc,
    #[serde(rename = "date-asc")]
    DateAsc,
    #[default]
    #[serde(rename = "date-desc")]
    DateDesc,
    #[serde(rename = "order-asc")]
    OrderAsc,
    #[serde(rename = "order-desc")]
    OrderDesc,
    /// No-op comparator: input order is kept.
    #[serde(rename = "none")]
    Original,
}

impl SortMode {
    pub const KEYS: [&'static str; 6] = [
        "az-asc",
        "az-desc",
        "date-asc",
        "date-desc",
        "order-asc",
        "order-desc",
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::AzAsc => "az-asc",
            SortMode::AzDesc => "az-desc",
            SortMode::DateAsc => "date-asc",
            SortMode::DateDesc => "date-desc",
            SortMode::OrderAsc => "order-asc",
            SortMode::OrderDesc => "order-desc",
            SortMode::Original => "none",
        }
    }

    /// Resolves a sort key, falling back to [`SortMode::Original`] for keys
    /// with no registered comparator.
    pub fn from_key(key: &str) -> Self {
        match key.parse() {
            Ok(mode) => mode,
            Err(_) => {
                tracing::warn!(key, "unknown sort key, keeping original order");
                SortMode::Original
            }
        }
    }

    /// Compares two records under this mode.
    pub fn compare<T: Listable + ?Sized>(&self, a: &T, b: &T) -> Ordering {
        match self {
            SortMode::AzAsc => compare_labels(a.label(), b.label()),
            SortMode::AzDesc => compare_labels(b.label(), a.label()),
            SortMode::DateAsc => date_key(a).cmp(&date_key(b)),
            SortMode::DateDesc => date_key(b).cmp(&date_key(a)),
            SortMode::OrderAsc => a.order().cmp(&b.order()),
            SortMode::OrderDesc => b.order().cmp(&a.order()),
            SortMode::Original => Ordering::Equal,
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "az-asc" => Ok(SortMode::AzAsc),
            "az-desc" => Ok(SortMode::AzDesc),
            "date-asc" => Ok(SortMode::DateAsc),
            "date-desc" => Ok(SortMode::DateDesc),
            "order-asc" => Ok(SortMode::OrderAsc),
            "order-desc" => Ok(SortMode::OrderDesc),
            "none" => Ok(SortMode::Original),
            other => Err(format!(
                "Invalid sort mode: {} (expected one of {})",
                other,
                SortMode::KEYS.join(", ")
            )),
        }
    }
}

/// Case-folded label comparison.
///
/// Labels are compared by their lowercase form first so "apple" and "Apple"
/// sort together; the raw text breaks ties so the order stays total.
pub fn compare_labels(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Milliseconds since the epoch; missing dates count as 0.
pub fn date_key<T: Listable + ?Sized>(item: &T) -> i64 {
    item.timestamp().map(|t| t.timestamp_millis()).unwrap_or(0)
}

/// Returns a newly sorted copy, leaving `items` untouched.
pub fn sorted<T: Listable + Clone>(items: &[T], mode: SortMode) -> Vec<T> {
    let mut out = items.to_vec();
    if mode != SortMode::Original {
        out.sort_by(|a, b| mode.compare(a, b));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::AttrValue;
    use chrono::{DateTime, TimeZone, Utc};

    #[derive(Debug, Clone)]
    struct Row {
        title: &'static str,
        order: i64,
        at: Option<DateTime<Utc>>,
    }

    impl Listable for Row {
        fn label(&self) -> &str {
            self.title
        }

        fn search_fields(&self) -> Vec<&str> {
            vec![self.title]
        }

        fn timestamp(&self) -> Option<DateTime<Utc>> {
            self.at
        }

        fn order(&self) -> i64 {
            self.order
        }

        fn attr(&self, _name: &str) -> Option<AttrValue> {
            None
        }
    }

    fn day(d: u32) -> Option<DateTime<Utc>> {
        Some(Utc.with_ymd_and_hms(2024, 3, d, 0, 0, 0).unwrap())
    }

    fn titles(rows: &[Row]) -> Vec<&'static str> {
        rows.iter().map(|r| r.title).collect()
    }

    fn sample() -> Vec<Row> {
        vec![
            Row { title: "Zebra", order: 2, at: day(2) },
            Row { title: "Apple", order: 1, at: day(3) },
            Row { title: "Mango", order: 3, at: day(1) },
        ]
    }

    #[test]
    fn az_sorting() {
        assert_eq!(titles(&sorted(&sample(), SortMode::AzAsc)), ["Apple", "Mango", "Zebra"]);
        assert_eq!(titles(&sorted(&sample(), SortMode::AzDesc)), ["Zebra", "Mango", "Apple"]);
    }

    #[test]
    fn order_sorting() {
        assert_eq!(titles(&sorted(&sample(), SortMode::OrderAsc)), ["Apple", "Zebra", "Mango"]);
        assert_eq!(titles(&sorted(&sample(), SortMode::OrderDesc)), ["Mango", "Zebra", "Apple"]);
    }

    #[test]
    fn date_sorting() {
        assert_eq!(titles(&sorted(&sample(), SortMode::DateAsc)), ["Mango", "Zebra", "Apple"]);
        assert_eq!(titles(&sorted(&sample(), SortMode::DateDesc)), ["Apple", "Zebra", "Mango"]);
    }

    #[test]
    fn missing_dates_sort_first_ascending() {
        let rows = vec![
            Row { title: "Dated", order: 0, at: day(1) },
            Row { title: "Undated", order: 0, at: None },
        ];
        assert_eq!(titles(&sorted(&rows, SortMode::DateAsc)), ["Undated", "Dated"]);
        assert_eq!(titles(&sorted(&rows, SortMode::DateDesc)), ["Dated", "Undated"]);
    }

    #[test]
    fn ties_keep_input_order() {
        let rows = vec![
            Row { title: "First", order: 1, at: None },
            Row { title: "Second", order: 1, at: None },
            Row { title: "Third", order: 1, at: None },
        ];
        assert_eq!(
            titles(&sorted(&rows, SortMode::OrderAsc)),
            ["First", "Second", "Third"]
        );
        assert_eq!(
            titles(&sorted(&rows, SortMode::DateDesc)),
            ["First", "Second", "Third"]
        );
    }

    #[test]
    fn labels_compare_case_insensitively() {
        let rows = vec![
            Row { title: "banana", order: 0, at: None },
            Row { title: "Apple", order: 0, at: None },
            Row { title: "cherry", order: 0, at: None },
        ];
        assert_eq!(
            titles(&sorted(&rows, SortMode::AzAsc)),
            ["Apple", "banana", "cherry"]
        );
    }

    #[test]
    fn unknown_key_falls_back_to_original_order() {
        let mode = SortMode::from_key("popularity");
        assert_eq!(mode, SortMode::Original);
        assert_eq!(titles(&sorted(&sample(), mode)), ["Zebra", "Apple", "Mango"]);
    }

    #[test]
    fn keys_roundtrip_through_display() {
        for key in SortMode::KEYS {
            let mode: SortMode = key.parse().unwrap();
            assert_eq!(mode.to_string(), key);
        }
    }

    #[test]
    fn input_is_not_mutated() {
        let rows = sample();
        let _ = sorted(&rows, SortMode::AzAsc);
        assert_eq!(titles(&rows), ["Zebra", "Apple", "Mango"]);
    }
}
