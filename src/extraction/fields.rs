//! Field access helpers.
//!
//! Corpus schemas are loose: fields may be missing, null, or of an unexpected type.
//! Helpers here never fail, they return `None`/defaults instead.
use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::RawRecord;

/// Get a string field. Missing, null or non-string values yield `None`.
pub fn get_str<'a>(record: &'a RawRecord, key: &str) -> Option<&'a str> {
    record.get(key).and_then(Value::as_str)
}

/// Get a string field, defaulting to `""`.
pub fn get_str_or_empty<'a>(record: &'a RawRecord, key: &str) -> &'a str {
    get_str(record, key).unwrap_or("")
}

/// Get a counter-like field (upvotes...).
///
/// Sources store those either as JSON numbers or as numeric strings (possibly empty).
/// Anything unparsable counts as 0.
pub fn get_count(record: &RawRecord, key: &str) -> u64 {
    match record.get(key) {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse::<u64>().unwrap_or(0),
        _ => 0,
    }
}

/// Length in unicode scalar values.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Truncation of oversized context fields.
///
/// Fields longer than `max_chars` are cut to exactly `max_chars` chars and get `marker` appended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Truncation {
    pub max_chars: usize,
    pub marker: String,
}

impl Truncation {
    pub fn new(max_chars: usize, marker: &str) -> Self {
        Self {
            max_chars,
            marker: marker.to_string(),
        }
    }

    pub fn apply<'a>(&self, content: &'a str) -> Cow<'a, str> {
        match content.char_indices().nth(self.max_chars) {
            // there's at least one char past the limit
            Some((byte_idx, _)) => {
                let mut trimmed = String::with_capacity(byte_idx + self.marker.len());
                trimmed.push_str(&content[..byte_idx]);
                trimmed.push_str(&self.marker);
                Cow::Owned(trimmed)
            }
            None => Cow::Borrowed(content),
        }
    }
}

impl Default for Truncation {
    /// 100 chars, `......` marker.
    fn default() -> Self {
        Self::new(100, "......")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(v: Value) -> RawRecord {
        match v {
            Value::Object(m) => m,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn truncation_under_limit() {
        let t = Truncation::new(5, "...");
        assert_eq!(t.apply("abcde"), "abcde");
        assert_eq!(t.apply(""), "");
    }

    #[test]
    fn truncation_over_limit() {
        let t = Truncation::new(5, "...");
        assert_eq!(t.apply("abcdef"), "abcde...");
    }

    #[test]
    fn truncation_counts_chars() {
        let t = Truncation::default();
        let long: String = std::iter::repeat('问').take(150).collect();
        let trimmed = t.apply(&long);
        assert_eq!(char_len(&trimmed), 100 + 6);
        assert!(trimmed.ends_with("......"));

        let short: String = std::iter::repeat('问').take(100).collect();
        assert_eq!(t.apply(&short), short.as_str());
    }

    #[test]
    fn counts() {
        let r = record(json!({"a": 12, "b": "1500", "c": "", "d": null, "e": "lots", "f": 3.7}));
        assert_eq!(get_count(&r, "a"), 12);
        assert_eq!(get_count(&r, "b"), 1500);
        assert_eq!(get_count(&r, "c"), 0);
        assert_eq!(get_count(&r, "d"), 0);
        assert_eq!(get_count(&r, "e"), 0);
        assert_eq!(get_count(&r, "f"), 3);
        assert_eq!(get_count(&r, "missing"), 0);
    }

    #[test]
    fn strings() {
        let r = record(json!({"a": "x", "b": null, "c": 1}));
        assert_eq!(get_str(&r, "a"), Some("x"));
        assert_eq!(get_str(&r, "b"), None);
        assert_eq!(get_str_or_empty(&r, "c"), "");
    }
}
