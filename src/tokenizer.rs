//! Tokenizers.
//!
//! Tokenization is optional: when enabled, workers convert every prompt/response into ids
//! before pushing it to the result channel.
use crate::error::Error;

/// Text to ids.
///
/// Implementors are shared between all workers, hence `Sync`.
pub trait Tokenizer: Send + Sync {
    fn encode(&self, text: &str) -> Result<Vec<u32>, Error>;
}

/// One id per UTF-8 byte.
///
/// No vocabulary needed, and the number of ids grows with the byte length of the input.
#[derive(Debug, Default, Clone, Copy)]
pub struct ByteTokenizer;

impl Tokenizer for ByteTokenizer {
    fn encode(&self, text: &str) -> Result<Vec<u32>, Error> {
        Ok(text.bytes().map(u32::from).collect())
    }
}

#[cfg(feature = "hf-tokenizer")]
pub use hf::HfTokenizer;

#[cfg(feature = "hf-tokenizer")]
mod hf {
    use std::path::Path;

    use log::info;

    use super::Tokenizer;
    use crate::error::Error;

    /// Wrapper around a HuggingFace `tokenizer.json`.
    pub struct HfTokenizer {
        inner: tokenizers::Tokenizer,
    }

    impl HfTokenizer {
        pub fn from_file(path: &Path) -> Result<Self, Error> {
            info!("loading tokenizer from {:?}", path);
            let inner = tokenizers::Tokenizer::from_file(path)
                .map_err(|e| Error::Tokenizer(format!("{:?}: {}", path, e)))?;
            Ok(Self { inner })
        }
    }

    impl Tokenizer for HfTokenizer {
        fn encode(&self, text: &str) -> Result<Vec<u32>, Error> {
            let encoding = self
                .inner
                .encode(text, false)
                .map_err(|e| Error::Tokenizer(e.to_string()))?;
            Ok(encoding.get_ids().to_vec())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_tokenizer_ids() {
        assert_eq!(ByteTokenizer.encode("AB").unwrap(), vec![65, 66]);
        assert_eq!(ByteTokenizer.encode("é").unwrap().len(), 2);
    }

    #[test]
    fn byte_tokenizer_monotone() {
        let inputs = ["", "a", "ab", "abc def", "abc defghijkl"];
        let lens: Vec<usize> = inputs
            .iter()
            .map(|i| ByteTokenizer.encode(i).unwrap().len())
            .collect();
        assert!(lens.windows(2).all(|w| w[0] <= w[1]));
    }
}
