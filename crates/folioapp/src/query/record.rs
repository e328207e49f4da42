//! Listable view over loosely typed JSON records.
//!
//! Used for ad-hoc exports where the record shape is only known at runtime.
//! Which keys act as label, date, order and search fields is configured with
//! [`RecordFields`].

use super::{AttrValue, Listable};
use crate::error::{FolioError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFields {
    pub label: String,
    pub date: String,
    pub order: String,
    pub search: Vec<String>,
}

impl Default for RecordFields {
    fn default() -> Self {
        Self {
            label: "title".to_string(),
            date: "createdAt".to_string(),
            order: "order".to_string(),
            search: vec![
                "title".to_string(),
                "description".to_string(),
                "slug".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone)]
pub struct JsonRecord {
    value: Value,
    fields: Arc<RecordFields>,
}

impl JsonRecord {
    pub fn new(value: Value, fields: Arc<RecordFields>) -> Self {
        Self { value, fields }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.value.get(key).and_then(Value::as_str)
    }
}

impl PartialEq for JsonRecord {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Serialize for JsonRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl Listable for JsonRecord {
    fn label(&self) -> &str {
        self.str_field(&self.fields.label).unwrap_or("")
    }

    fn search_fields(&self) -> Vec<&str> {
        self.fields
            .search
            .iter()
            .filter_map(|key| self.str_field(key))
            .collect()
    }

    fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.value.get(&self.fields.date).and_then(parse_timestamp)
    }

    fn order(&self) -> i64 {
        match self.value.get(&self.fields.order) {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .unwrap_or(0),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
            _ => 0,
        }
    }

    fn attr(&self, name: &str) -> Option<AttrValue> {
        match self.value.get(name)? {
            Value::Bool(b) => Some(AttrValue::Bool(*b)),
            Value::String(s) => Some(AttrValue::Enum(s.clone())),
            Value::Number(n) => Some(AttrValue::Enum(n.to_string())),
            Value::Null => Some(AttrValue::Ref(None)),
            Value::Array(items) => Some(AttrValue::List(
                items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect(),
            )),
            Value::Object(_) => None,
        }
    }
}

/// Reads a date from RFC 3339 text, a plain `YYYY-MM-DD` date or epoch
/// milliseconds. Anything else is `None`.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        }
        Value::Number(n) => n.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    }
}

/// Parses a JSON array of objects into records, dropping tombstoned
/// (`"deleted": true`) entries.
pub fn parse_records(json: &str, fields: RecordFields) -> Result<Vec<JsonRecord>> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Array(items) = value else {
        return Err(FolioError::validation("expected a JSON array of records"));
    };

    let fields = Arc::new(fields);
    let total = items.len();
    let records: Vec<JsonRecord> = items
        .into_iter()
        .filter(|item| item.is_object())
        .filter(|item| item.get("deleted").and_then(Value::as_bool) != Some(true))
        .map(|item| JsonRecord::new(item, Arc::clone(&fields)))
        .collect();

    if records.len() != total {
        tracing::debug!(
            skipped = total - records.len(),
            "dropped deleted or non-object records"
        );
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{run, AttrFilter, ListQuery, SortMode};
    use serde_json::json;

    fn records(value: Value) -> Vec<JsonRecord> {
        parse_records(&value.to_string(), RecordFields::default()).unwrap()
    }

    #[test]
    fn rejects_non_arrays() {
        assert!(parse_records("{}", RecordFields::default()).is_err());
        assert!(parse_records("not json", RecordFields::default()).is_err());
    }

    #[test]
    fn drops_deleted_records() {
        let rs = records(json!([
            {"title": "Live"},
            {"title": "Gone", "deleted": true},
            {"title": "Also live", "deleted": false},
            42
        ]));
        let titles: Vec<&str> = rs.iter().map(|r| r.label()).collect();
        assert_eq!(titles, ["Live", "Also live"]);
    }

    #[test]
    fn timestamps_in_several_formats() {
        assert!(parse_timestamp(&json!("2024-05-01T10:00:00Z")).is_some());
        assert!(parse_timestamp(&json!("2024-05-01")).is_some());
        assert_eq!(
            parse_timestamp(&json!(1_700_000_000_000i64)).map(|t| t.timestamp()),
            Some(1_700_000_000)
        );
        assert!(parse_timestamp(&json!("yesterday")).is_none());
        assert!(parse_timestamp(&json!(null)).is_none());
    }

    #[test]
    fn unparseable_dates_sort_as_epoch() {
        let rs = records(json!([
            {"title": "Dated", "createdAt": "2024-01-01T00:00:00Z"},
            {"title": "Garbage", "createdAt": "not a date"},
            {"title": "Missing"}
        ]));
        let page = run(&rs, &ListQuery::new(SortMode::DateAsc, 10));
        let titles: Vec<&str> = page.items.iter().map(|r| r.label()).collect();
        assert_eq!(titles, ["Garbage", "Missing", "Dated"]);
    }

    #[test]
    fn attribute_filters_on_json() {
        let rs = records(json!([
            {"title": "A", "status": "draft"},
            {"title": "B", "status": "published"},
            {"title": "C", "status": "published"},
            {"title": "D", "status": "scheduled"}
        ]));
        let query = ListQuery::default().with_filter(AttrFilter::choice("status", "published"));
        assert_eq!(run(&rs, &query).total_filtered, 2);
    }

    #[test]
    fn order_accepts_numbers_and_strings() {
        let rs = records(json!([
            {"title": "x", "order": 3},
            {"title": "y", "order": "1"},
            {"title": "z", "order": 2.7}
        ]));
        let orders: Vec<i64> = rs.iter().map(|r| r.order()).collect();
        assert_eq!(orders, [3, 1, 2]);
    }

    #[test]
    fn serializes_as_underlying_value() {
        let rs = records(json!([{"title": "A", "extra": {"k": 1}}]));
        let out = serde_json::to_value(&rs[0]).unwrap();
        assert_eq!(out, json!({"title": "A", "extra": {"k": 1}}));
    }
}
