//! Zhidao question records.
//!
//! One record is one question with a best answer and a list of other answers.
//! Every qualifying answer produces a pair sharing the same prompt.
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::fields::{char_len, get_str, get_str_or_empty, Truncation};
use super::{Extract, RawRecord};
use crate::sample::ExtractedPair;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Zhidao {
    pub title_prefix: String,
    pub content_prefix: String,
    pub answer_prefix: String,
    pub min_best_answer_chars: usize,
    pub min_other_answer_chars: usize,
    pub truncation: Truncation,
}

impl Default for Zhidao {
    fn default() -> Self {
        Self {
            title_prefix: "问题：".to_string(),
            content_prefix: "问题描述：".to_string(),
            answer_prefix: "回答：".to_string(),
            min_best_answer_chars: 11,
            min_other_answer_chars: 101,
            truncation: Truncation::default(),
        }
    }
}

/// `content` of an answer object.
fn answer_content(answer: &Value) -> Option<&str> {
    answer.get("content").and_then(Value::as_str)
}

impl Extract for Zhidao {
    fn extract(&self, record: &RawRecord) -> Vec<ExtractedPair> {
        let title = match get_str(record, "title") {
            Some(t) => t,
            None => return Vec::new(),
        };
        let content = self.truncation.apply(get_str_or_empty(record, "content"));
        let prompt = [
            self.title_prefix.as_str(),
            title,
            self.content_prefix.as_str(),
            &*content,
            self.answer_prefix.as_str(),
        ]
        .concat();

        let best = record
            .get("best_answer")
            .and_then(answer_content)
            .filter(|text| char_len(text) >= self.min_best_answer_chars);

        let others = record
            .get("other_answers")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(answer_content)
            .filter(|text| char_len(text) >= self.min_other_answer_chars);

        best.into_iter()
            .chain(others)
            .map(|text| ExtractedPair::new(prompt.as_str(), text))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::extraction::tests::record;
    use crate::sample::Sample;

    const PROMPT: &str = "问题：T问题描述：C回答：";

    #[test]
    fn best_and_others() {
        let r = record(json!({
            "title": "T",
            "content": "C",
            "best_answer": {"content": "b".repeat(11)},
            "other_answers": [
                {"content": "o".repeat(101)},
                {"content": "too short"},
                {"no_content": true},
                {"content": "p".repeat(150)},
            ],
        }));
        let pairs = Zhidao::default().extract(&r);
        assert_eq!(
            pairs,
            vec![
                ExtractedPair::new(PROMPT, "b".repeat(11)),
                ExtractedPair::new(PROMPT, "o".repeat(101)),
                ExtractedPair::new(PROMPT, "p".repeat(150)),
            ]
        );
    }

    #[test]
    fn short_best_answer_rejected() {
        let r = record(json!({
            "title": "T",
            "content": "C",
            "best_answer": {"content": "b".repeat(10)},
        }));
        assert!(Zhidao::default().extract(&r).is_empty());
    }

    #[test]
    fn no_title_no_pairs() {
        let r = record(json!({"best_answer": {"content": "b".repeat(50)}}));
        assert!(Zhidao::default().extract(&r).is_empty());
    }

    #[test]
    fn missing_content_defaults_to_empty() {
        let r = record(json!({
            "title": "T",
            "best_answer": {"content": "b".repeat(20)},
        }));
        let pairs = Zhidao::default().extract(&r);
        assert_eq!(pairs[0].prompt, Sample::from("问题：T问题描述：回答："));
    }
}
