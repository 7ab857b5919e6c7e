//! Filter sets and their canonical cache keys.
//!
//! A [`FilterSet`] is rebuilt from UI state on every change, so two sets that
//! mean the same thing must produce the same [`CacheKey`] no matter the order
//! in which filters were inserted or multi-valued filters were selected.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::app::{ReelfeedError, Result};

/// Inclusive numeric range, e.g. a time-of-day window in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Range {
    pub from: i64,
    pub to: i64,
}

impl Range {
    pub fn new(from: i64, to: i64) -> Result<Self> {
        if from > to {
            return Err(ReelfeedError::InvalidFilter(format!(
                "range start {} is after end {}",
                from, to
            )));
        }
        Ok(Self { from, to })
    }

    /// Parse a time-of-day window like `"18:00-23:30"` into minutes since midnight.
    pub fn from_time_window(s: &str) -> Result<Self> {
        let (start, end) = s.split_once('-').ok_or_else(|| {
            ReelfeedError::InvalidFilter(format!("Invalid time range: {}. Use HH:MM-HH:MM", s))
        })?;
        Self::new(parse_minutes(start)?, parse_minutes(end)?)
    }
}

fn parse_minutes(s: &str) -> Result<i64> {
    let invalid = || ReelfeedError::InvalidFilter(format!("Invalid time of day: {}", s.trim()));
    let (hours, minutes) = s.trim().split_once(':').ok_or_else(invalid)?;
    let hours: i64 = hours.parse().map_err(|_| invalid())?;
    let minutes: i64 = minutes.parse().map_err(|_| invalid())?;
    // 24:00 is allowed as the end of the day
    if !(0..=24).contains(&hours) || !(0..60).contains(&minutes) || (hours == 24 && minutes > 0) {
        return Err(invalid());
    }
    Ok(hours * 60 + minutes)
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterValue {
    Text(String),
    Flag(bool),
    /// Multi-valued filter whose element order carries no meaning.
    Set(Vec<String>),
    /// Multi-valued range filter whose element order carries no meaning.
    Ranges(Vec<Range>),
}

impl FilterValue {
    /// Sorted, de-duplicated form. `None` when the value is empty and
    /// therefore equivalent to the filter being absent.
    fn normalized(&self) -> Option<FilterValue> {
        match self {
            FilterValue::Text(s) if s.is_empty() => None,
            FilterValue::Text(s) => Some(FilterValue::Text(s.clone())),
            FilterValue::Flag(b) => Some(FilterValue::Flag(*b)),
            FilterValue::Set(values) => {
                let mut values = values.clone();
                values.sort();
                values.dedup();
                (!values.is_empty()).then_some(FilterValue::Set(values))
            }
            FilterValue::Ranges(ranges) => {
                let mut ranges = ranges.clone();
                ranges.sort();
                ranges.dedup();
                (!ranges.is_empty()).then_some(FilterValue::Ranges(ranges))
            }
        }
    }

    fn to_json(&self) -> Value {
        match self {
            FilterValue::Text(s) => json!({ "text": s }),
            FilterValue::Flag(b) => json!({ "flag": b }),
            FilterValue::Set(values) => json!({ "set": values }),
            FilterValue::Ranges(ranges) => json!({
                "ranges": ranges.iter().map(|r| json!([r.from, r.to])).collect::<Vec<_>>()
            }),
        }
    }
}

/// Named filter values selected in the UI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSet {
    filters: BTreeMap<String, FilterValue>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: FilterValue) {
        self.filters.insert(name.into(), value);
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, FilterValue::Text(value.into()));
        self
    }

    pub fn flag(mut self, name: impl Into<String>, value: bool) -> Self {
        self.insert(name, FilterValue::Flag(value));
        self
    }

    pub fn set<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.insert(name, FilterValue::Set(values));
        self
    }

    pub fn ranges(mut self, name: impl Into<String>, ranges: Vec<Range>) -> Self {
        self.insert(name, FilterValue::Ranges(ranges));
        self
    }

    pub fn get(&self, name: &str) -> Option<&FilterValue> {
        self.filters.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.normalized().is_empty()
    }

    fn normalized(&self) -> BTreeMap<&str, FilterValue> {
        self.filters
            .iter()
            .filter_map(|(name, value)| value.normalized().map(|v| (name.as_str(), v)))
            .collect()
    }

    /// Query-string pairs in canonical order.
    ///
    /// Set filters repeat the parameter once per element; ranges render as
    /// `from-to`.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for (name, value) in self.normalized() {
            match value {
                FilterValue::Text(s) => pairs.push((name.to_string(), s)),
                FilterValue::Flag(b) => pairs.push((name.to_string(), b.to_string())),
                FilterValue::Set(values) => {
                    pairs.extend(values.into_iter().map(|v| (name.to_string(), v)))
                }
                FilterValue::Ranges(ranges) => {
                    pairs.extend(ranges.iter().map(|r| (name.to_string(), r.to_string())))
                }
            }
        }
        pairs
    }
}

/// Canonical, order-independent rendering of a [`FilterSet`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn build_key(filters: &FilterSet) -> CacheKey {
    let mut map = Map::new();
    // normalized() iterates in key order, so the object is sorted regardless
    // of whether serde_json preserves insertion order
    for (name, value) in filters.normalized() {
        map.insert(name.to_string(), value.to_json());
    }
    CacheKey(Value::Object(map).to_string())
}

/// Whether moving from `prev` to `next` selects a different feed.
pub fn should_refetch(prev: &FilterSet, next: &FilterSet) -> bool {
    build_key(prev) != build_key(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_ignores_set_order_and_insertion_order() {
        let a = FilterSet::new().set("days", ["b", "a"]).text("query", "x");
        let b = FilterSet::new().text("query", "x").set("days", ["a", "b"]);
        assert_eq!(build_key(&a), build_key(&b));
    }

    #[test]
    fn test_flag_values_are_distinct() {
        let on = FilterSet::new().flag("watchlistOnly", true);
        let off = FilterSet::new().flag("watchlistOnly", false);
        assert_ne!(build_key(&on), build_key(&off));
    }

    #[test]
    fn test_false_flag_differs_from_absent() {
        let off = FilterSet::new().flag("watchlistOnly", false);
        assert_ne!(build_key(&off), build_key(&FilterSet::new()));
    }

    #[test]
    fn test_empty_values_equal_absent() {
        let empty = FilterSet::new()
            .text("query", "")
            .set("days", Vec::<String>::new())
            .ranges("timeRanges", vec![]);
        assert_eq!(build_key(&empty), build_key(&FilterSet::new()));
        assert!(empty.is_empty());
    }

    #[test]
    fn test_duplicate_set_elements_collapse() {
        let a = FilterSet::new().set("selectedCinemaIds", ["1", "2", "1"]);
        let b = FilterSet::new().set("selectedCinemaIds", ["2", "1"]);
        assert_eq!(build_key(&a), build_key(&b));
    }

    #[test]
    fn test_range_order_is_ignored() {
        let early = Range::new(600, 720).unwrap();
        let late = Range::new(1080, 1380).unwrap();
        let a = FilterSet::new().ranges("timeRanges", vec![late, early]);
        let b = FilterSet::new().ranges("timeRanges", vec![early, late]);
        assert_eq!(build_key(&a), build_key(&b));
    }

    #[test]
    fn test_text_and_set_with_same_content_differ() {
        let text = FilterSet::new().text("days", "a");
        let set = FilterSet::new().set("days", ["a"]);
        assert_ne!(build_key(&text), build_key(&set));
    }

    #[test]
    fn test_should_refetch() {
        let a = FilterSet::new().set("days", ["2026-10-19", "2026-10-20"]);
        let b = FilterSet::new().set("days", ["2026-10-20", "2026-10-19"]);
        let c = FilterSet::new().set("days", ["2026-10-20"]);
        assert!(!should_refetch(&a, &b));
        assert!(should_refetch(&a, &c));
    }

    #[test]
    fn test_query_pairs_are_canonical() {
        let filters = FilterSet::new()
            .text("query", "alien")
            .set("selectedCinemaIds", ["7", "3"])
            .flag("watchlistOnly", true)
            .ranges("timeRanges", vec![Range::new(1080, 1380).unwrap()]);

        assert_eq!(
            filters.to_query_pairs(),
            vec![
                ("query".to_string(), "alien".to_string()),
                ("selectedCinemaIds".to_string(), "3".to_string()),
                ("selectedCinemaIds".to_string(), "7".to_string()),
                ("timeRanges".to_string(), "1080-1380".to_string()),
                ("watchlistOnly".to_string(), "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_time_window_parsing() {
        let range = Range::from_time_window("18:00-23:30").unwrap();
        assert_eq!(range, Range { from: 1080, to: 1410 });
        assert_eq!(Range::from_time_window("00:00-24:00").unwrap().to, 1440);
    }

    #[test]
    fn test_time_window_rejects_garbage() {
        assert!(Range::from_time_window("18:00").is_err());
        assert!(Range::from_time_window("25:00-26:00").is_err());
        assert!(Range::from_time_window("20:00-18:00").is_err());
        assert!(Range::from_time_window("ab:cd-18:00").is_err());
    }
}
