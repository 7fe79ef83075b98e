//! Output units.
//!
//! An [ExtractedPair] is what every extraction rule produces and what the aggregator writes:
//! its prompt goes to the prompt sink, its response to the text sink, at the same position.
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::tokenizer::Tokenizer;

/// A single prompt or response, either raw or tokenized.
///
/// Serialized untagged: a JSON string for [Sample::Text], a JSON array of ids for [Sample::Tokens].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Sample {
    Text(String),
    Tokens(Vec<u32>),
}

impl Sample {
    /// Converts a textual sample into token ids.
    ///
    /// Empty strings map to an empty sequence without calling the tokenizer.
    /// Already tokenized samples are returned as-is.
    pub fn tokenize(self, tokenizer: &dyn Tokenizer) -> Result<Sample, Error> {
        match self {
            Sample::Text(t) if t.is_empty() => Ok(Sample::Tokens(Vec::new())),
            Sample::Text(t) => Ok(Sample::Tokens(tokenizer.encode(&t)?)),
            tokens @ Sample::Tokens(_) => Ok(tokens),
        }
    }

    /// Length in chars (text) or in ids (tokens).
    pub fn len(&self) -> usize {
        match self {
            Sample::Text(t) => t.chars().count(),
            Sample::Tokens(ids) => ids.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Sample::Text(t) => t.is_empty(),
            Sample::Tokens(ids) => ids.is_empty(),
        }
    }
}

impl From<String> for Sample {
    fn from(s: String) -> Self {
        Sample::Text(s)
    }
}

impl From<&str> for Sample {
    fn from(s: &str) -> Self {
        Sample::Text(s.to_string())
    }
}

/// A (prompt, response) couple coming from a single raw record.
///
/// Both halves travel together through the channels and are never split before writing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractedPair {
    pub prompt: Sample,
    pub response: Sample,
}

impl ExtractedPair {
    pub fn new(prompt: impl Into<Sample>, response: impl Into<Sample>) -> Self {
        Self {
            prompt: prompt.into(),
            response: response.into(),
        }
    }

    /// Tokenize both halves with the same tokenizer.
    pub fn tokenize(self, tokenizer: &dyn Tokenizer) -> Result<Self, Error> {
        Ok(Self {
            prompt: self.prompt.tokenize(tokenizer)?,
            response: self.response.tokenize(tokenizer)?,
        })
    }
}
