/*! Extraction rules

A rule maps one raw record to zero or more [ExtractedPair]s.

Rules are pure: they never fail. A record that lacks what a rule needs simply yields nothing.
Each corpus selects one [ExtractionRule] variant (see [crate::corpora]), and workers dispatch through it.
!*/
mod fields;
mod text;
mod zhidao;
mod zhihu;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::sample::ExtractedPair;

pub use fields::Truncation;
pub use text::{Concat, TextField};
pub use zhidao::Zhidao;
pub use zhihu::Zhihu;

/// One parsed JSON-lines record.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// Parse a raw line into a [RawRecord].
///
/// Fails on invalid JSON and on JSON values that are not objects.
pub fn parse_record(line: &str) -> Result<RawRecord, Error> {
    Ok(serde_json::from_str(line)?)
}

pub trait Extract {
    /// Produce pairs for a record, in emission order.
    fn extract(&self, record: &RawRecord) -> Vec<ExtractedPair>;
}

/// Closed set of extraction rules.
///
/// (De)serialized with an inner `rule` tag, so that registries can be written as
/// `{"rule": "zhidao", "min_best_answer_chars": 20}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ExtractionRule {
    TextField(TextField),
    Concat(Concat),
    Zhihu(Zhihu),
    Zhidao(Zhidao),
}

impl ExtractionRule {
    pub fn name(&self) -> &'static str {
        match self {
            Self::TextField(_) => "text_field",
            Self::Concat(_) => "concat",
            Self::Zhihu(_) => "zhihu",
            Self::Zhidao(_) => "zhidao",
        }
    }
}

impl Default for ExtractionRule {
    fn default() -> Self {
        ExtractionRule::TextField(TextField::default())
    }
}

impl Extract for ExtractionRule {
    fn extract(&self, record: &RawRecord) -> Vec<ExtractedPair> {
        match self {
            Self::TextField(r) => r.extract(record),
            Self::Concat(r) => r.extract(record),
            Self::Zhihu(r) => r.extract(record),
            Self::Zhidao(r) => r.extract(record),
        }
    }
}
