use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A scalar value in the applied filter map
///
/// The wire format carries strings, numbers, and booleans; multi-value
/// dropdown selections travel as a comma-joined `Text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Flag(bool),
    Number(i64),
    Float(f64),
    Text(String),
}

impl FilterValue {
    pub fn text(s: impl Into<String>) -> FilterValue {
        FilterValue::Text(s.into())
    }

    pub fn number(n: i64) -> FilterValue {
        FilterValue::Number(n)
    }

    /// Whether this value counts as absent on the wire.
    ///
    /// Mirrors the consumer's query-string builder, which skips falsy
    /// entries: empty text, zero, and `false` never reach the request.
    pub fn is_falsy(&self) -> bool {
        match self {
            FilterValue::Flag(b) => !b,
            FilterValue::Number(n) => *n == 0,
            FilterValue::Float(f) => *f == 0.0,
            FilterValue::Text(s) => s.is_empty(),
        }
    }

    /// Numeric view of this value, if it has one. Text is parsed, so an id
    /// that round-tripped through a query string still resolves.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FilterValue::Number(n) => Some(*n),
            FilterValue::Text(s) => s.trim().parse().ok(),
            FilterValue::Flag(_) | FilterValue::Float(_) => None,
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Flag(b) => write!(f, "{}", b),
            FilterValue::Number(n) => write!(f, "{}", n),
            FilterValue::Float(x) => write!(f, "{}", x),
            FilterValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> FilterValue {
        FilterValue::Text(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> FilterValue {
        FilterValue::Text(s)
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> FilterValue {
        FilterValue::Number(n)
    }
}

impl From<i32> for FilterValue {
    fn from(n: i32) -> FilterValue {
        FilterValue::Number(n.into())
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> FilterValue {
        FilterValue::Flag(b)
    }
}

/// The flat, wire-shaped filter record — the contract with the
/// list-fetching API
///
/// Keys are either direct field names (`status_id`, `search`) or the
/// `_from`/`_to` expansions of a logical date field. Insertion order is
/// preserved for display stability; equality is order-independent, so two
/// maps are equal exactly when they hold the same key/value pairs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppliedFilterMap(IndexMap<String, FilterValue>);

impl AppliedFilterMap {
    pub fn new() -> AppliedFilterMap {
        AppliedFilterMap::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Insert unconditionally. Most callers want [`set`](Self::set).
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FilterValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Set a field, or remove it when the value is falsy.
    ///
    /// This is the single-field change path the chip-delete and inline
    /// dropdown controls use: clearing a control removes the key rather
    /// than leaving an empty entry behind.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<FilterValue>) {
        let key = key.into();
        let value = value.into();
        if value.is_falsy() {
            self.0.shift_remove(&key);
        } else {
            self.0.insert(key, value);
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<FilterValue> {
        self.0.shift_remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FilterValue)> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// Render as `(key, value)` string pairs in map order, skipping falsy
    /// entries, ready for the consumer's query-string builder.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .filter(|(_, v)| !v.is_falsy())
            .map(|(k, v)| (k.clone(), v.to_string()))
            .collect()
    }
}

impl<K: Into<String>, V: Into<FilterValue>> FromIterator<(K, V)> for AppliedFilterMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> AppliedFilterMap {
        AppliedFilterMap(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- FilterValue ---

    #[test]
    fn test_falsy_values() {
        assert!(FilterValue::text("").is_falsy());
        assert!(FilterValue::Number(0).is_falsy());
        assert!(FilterValue::Flag(false).is_falsy());
        assert!(!FilterValue::text("bug").is_falsy());
        assert!(!FilterValue::Number(7).is_falsy());
        assert!(!FilterValue::Flag(true).is_falsy());
    }

    #[test]
    fn test_as_i64_parses_text() {
        assert_eq!(FilterValue::Number(7).as_i64(), Some(7));
        assert_eq!(FilterValue::text("7").as_i64(), Some(7));
        assert_eq!(FilterValue::text(" 7 ").as_i64(), Some(7));
        assert_eq!(FilterValue::text("seven").as_i64(), None);
        assert_eq!(FilterValue::Flag(true).as_i64(), None);
    }

    #[test]
    fn test_display_is_wire_form() {
        assert_eq!(FilterValue::Number(3).to_string(), "3");
        assert_eq!(FilterValue::text("1,2,3").to_string(), "1,2,3");
        assert_eq!(FilterValue::Flag(true).to_string(), "true");
        assert_eq!(FilterValue::Float(1.5).to_string(), "1.5");
    }

    #[test]
    fn test_untagged_deserialize() {
        let v: FilterValue = serde_json::from_str("1").unwrap();
        assert_eq!(v, FilterValue::Number(1));
        let v: FilterValue = serde_json::from_str("\"bug\"").unwrap();
        assert_eq!(v, FilterValue::text("bug"));
        let v: FilterValue = serde_json::from_str("true").unwrap();
        assert_eq!(v, FilterValue::Flag(true));
        let v: FilterValue = serde_json::from_str("1.5").unwrap();
        assert_eq!(v, FilterValue::Float(1.5));
    }

    // --- AppliedFilterMap ---

    #[test]
    fn test_set_and_get() {
        let mut map = AppliedFilterMap::new();
        map.set("status_id", 1);
        map.set("search", "bug");
        assert_eq!(map.get("status_id"), Some(&FilterValue::Number(1)));
        assert_eq!(map.get("search"), Some(&FilterValue::text("bug")));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_set_empty_removes_key() {
        let mut map = AppliedFilterMap::new();
        map.set("search", "bug");
        map.set("search", "");
        assert!(!map.contains_key("search"));
        assert!(map.is_empty());
    }

    #[test]
    fn test_equality_ignores_order() {
        let a: AppliedFilterMap = [("status_id", 1), ("priority_id", 2)].into_iter().collect();
        let b: AppliedFilterMap = [("priority_id", 2), ("status_id", 1)].into_iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_query_pairs_skip_falsy() {
        let mut map = AppliedFilterMap::new();
        map.insert("status_id", 1);
        map.insert("is_inactive", false);
        map.insert("search", "");
        assert_eq!(
            map.to_query_pairs(),
            vec![("status_id".to_string(), "1".to_string())]
        );
    }

    #[test]
    fn test_serde_transparent() {
        let map: AppliedFilterMap =
            serde_json::from_str(r#"{"status_id": 1, "search": "bug"}"#).unwrap();
        assert_eq!(map.get("status_id"), Some(&FilterValue::Number(1)));
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"status_id":1,"search":"bug"}"#);
    }
}
