//! Checks on generated prompt/text files.
//!
//! Reads both files side by side, verifies that they have the same number of entries
//! and counts their size (chars for text entries, ids for tokenized ones).
use std::path::Path;

use itertools::{EitherOrBoth, Itertools};
use serde::Serialize;

use crate::error::Error;
use crate::io::sink::read_samples;

/// Sizes of an aligned prompt/text file couple.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PairStats {
    pub nb_pairs: u64,
    pub prompt_count: u64,
    pub text_count: u64,
    /// pairs with an empty prompt
    pub empty_prompts: u64,
}

impl PairStats {
    /// Total size: prompts and texts together.
    pub fn total_count(&self) -> u64 {
        self.prompt_count + self.text_count
    }
}

/// Read `prompts` and `texts` in lockstep.
///
/// Errors if an entry can't be read or if one file has more entries than the other.
pub fn check_pairs(prompts: &Path, texts: &Path) -> Result<PairStats, Error> {
    let mut stats = PairStats::default();

    for entry in read_samples(prompts)?.zip_longest(read_samples(texts)?) {
        match entry {
            EitherOrBoth::Both(prompt, text) => {
                let (prompt, text) = (prompt?, text?);
                stats.nb_pairs += 1;
                stats.prompt_count += prompt.len() as u64;
                stats.text_count += text.len() as u64;
                if prompt.is_empty() {
                    stats.empty_prompts += 1;
                }
            }
            EitherOrBoth::Left(_) | EitherOrBoth::Right(_) => {
                return Err(Error::Custom(format!(
                    "{:?} and {:?} are misaligned after {} pairs",
                    prompts, texts, stats.nb_pairs
                )));
            }
        }
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aligned() {
        let dir = tempfile::tempdir().unwrap();
        let prompts = dir.path().join("p.jsonl");
        let texts = dir.path().join("t.jsonl");
        std::fs::write(&prompts, "\"ab\"\n\"\"\n").unwrap();
        std::fs::write(&texts, "\"cde\"\n[1,2,3,4]\n").unwrap();

        let stats = check_pairs(&prompts, &texts).unwrap();
        assert_eq!(
            stats,
            PairStats {
                nb_pairs: 2,
                prompt_count: 2,
                text_count: 7,
                empty_prompts: 1,
            }
        );
        assert_eq!(stats.total_count(), 9);
    }

    #[test]
    fn misaligned() {
        let dir = tempfile::tempdir().unwrap();
        let prompts = dir.path().join("p.jsonl");
        let texts = dir.path().join("t.jsonl");
        std::fs::write(&prompts, "\"a\"\n\"b\"\n").unwrap();
        std::fs::write(&texts, "\"c\"\n").unwrap();

        assert!(check_pairs(&prompts, &texts).is_err());
    }
}
