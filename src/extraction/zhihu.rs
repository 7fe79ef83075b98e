//! Zhihu question/answer records.
//!
//! One record is one answer. It is kept if it is either long enough or popular enough,
//! and the prompt is built from the question title, a trimmed description and the author signature.
use serde::{Deserialize, Serialize};

use super::fields::{char_len, get_count, get_str, get_str_or_empty, Truncation};
use super::{Extract, RawRecord};
use crate::sample::ExtractedPair;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Zhihu {
    pub title_prefix: String,
    pub content_prefix: String,
    pub user_prefix: String,
    pub answer_prefix: String,
    /// answers with at least that many chars are kept
    pub min_answer_chars: usize,
    /// answers with at least that many upvotes are kept
    pub min_upvotes: u64,
    pub truncation: Truncation,
}

impl Default for Zhihu {
    fn default() -> Self {
        Self {
            title_prefix: "问题：".to_string(),
            content_prefix: "问题描述：".to_string(),
            user_prefix: "回答用户：".to_string(),
            answer_prefix: " 回答：".to_string(),
            min_answer_chars: 101,
            min_upvotes: 1001,
            truncation: Truncation::default(),
        }
    }
}

impl Zhihu {
    fn accept(&self, answer: &str, upvotes: u64) -> bool {
        char_len(answer) >= self.min_answer_chars || upvotes >= self.min_upvotes
    }
}

impl Extract for Zhihu {
    fn extract(&self, record: &RawRecord) -> Vec<ExtractedPair> {
        let answer = get_str_or_empty(record, "ans-content");
        let upvotes = get_count(record, "ans-up-num");
        if !self.accept(answer, upvotes) {
            return Vec::new();
        }

        let (title, answer) = match (get_str(record, "q_title"), get_str(record, "ans-content")) {
            (Some(title), Some(answer)) => (title, answer),
            _ => return Vec::new(),
        };

        let content = self.truncation.apply(get_str_or_empty(record, "q-content"));
        let user = get_str_or_empty(record, "user-signature");

        let prompt = [
            self.title_prefix.as_str(),
            title,
            self.content_prefix.as_str(),
            &*content,
            self.user_prefix.as_str(),
            user,
            self.answer_prefix.as_str(),
        ]
        .concat();

        vec![ExtractedPair::new(prompt, answer)]
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::extraction::tests::record;
    use crate::sample::Sample;

    fn long_answer(n: usize) -> String {
        "答".repeat(n)
    }

    #[test]
    fn prompt_layout() {
        let answer = long_answer(101);
        let r = record(json!({
            "q_title": "标题",
            "q-content": "描述",
            "user-signature": "签名",
            "ans-content": answer,
            "ans-up-num": "3",
        }));
        let pairs = Zhihu::default().extract(&r);
        assert_eq!(
            pairs,
            vec![ExtractedPair::new(
                "问题：标题问题描述：描述回答用户：签名 回答：",
                answer.as_str()
            )]
        );
    }

    #[test]
    fn short_unpopular_answer_rejected() {
        let r = record(json!({
            "q_title": "标题",
            "ans-content": long_answer(100),
            "ans-up-num": "1000",
        }));
        assert!(Zhihu::default().extract(&r).is_empty());
    }

    #[test]
    fn popular_short_answer_kept() {
        let r = record(json!({
            "q_title": "标题",
            "q-content": null,
            "ans-content": "短",
            "ans-up-num": 1001,
        }));
        let pairs = Zhihu::default().extract(&r);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].prompt, Sample::from("问题：标题问题描述：回答用户： 回答："));
    }

    #[test]
    fn description_is_trimmed() {
        let r = record(json!({
            "q_title": "t",
            "q-content": "x".repeat(150),
            "ans-content": long_answer(200),
        }));
        let pairs = Zhihu::default().extract(&r);
        let expected = format!("问题：t问题描述：{}......回答用户： 回答：", "x".repeat(100));
        assert_eq!(pairs[0].prompt, Sample::from(expected));
    }

    #[test]
    fn missing_title_yields_nothing() {
        let r = record(json!({"ans-content": long_answer(300)}));
        assert!(Zhihu::default().extract(&r).is_empty());
    }
}
