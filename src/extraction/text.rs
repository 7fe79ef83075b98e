//! Plain text rules: no prompt, the whole content is the response.
use serde::{Deserialize, Serialize};

use super::fields::get_str;
use super::{Extract, RawRecord};
use crate::sample::ExtractedPair;

/// Takes a single text field as response (wikipedia, webtext).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextField {
    pub key: String,
}

impl TextField {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
        }
    }
}

impl Default for TextField {
    fn default() -> Self {
        Self::new("text")
    }
}

impl Extract for TextField {
    fn extract(&self, record: &RawRecord) -> Vec<ExtractedPair> {
        match get_str(record, &self.key) {
            Some(text) => vec![ExtractedPair::new("", text)],
            None => Vec::new(),
        }
    }
}

/// Concatenates several fields into a single response (baike).
///
/// Missing fields are skipped. Nothing is emitted if the result is empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Concat {
    pub keys: Vec<String>,
}

impl Default for Concat {
    fn default() -> Self {
        Self {
            keys: vec![
                "title".to_string(),
                "abstract".to_string(),
                "content".to_string(),
            ],
        }
    }
}

impl Extract for Concat {
    fn extract(&self, record: &RawRecord) -> Vec<ExtractedPair> {
        let text: String = self
            .keys
            .iter()
            .filter_map(|key| get_str(record, key))
            .collect();

        if text.is_empty() {
            Vec::new()
        } else {
            vec![ExtractedPair::new("", text)]
        }
    }
}
