//! Corpus registry.
//!
//! Maps corpus names to their [CorpusDescriptor]: where the raw data lives and which
//! [ExtractionRule] applies. Built-in corpora are declared in [BUILTIN], and can be
//! overridden or extended with a JSON registry file:
//!
//! ```json
//! {
//!     "zhidao": {"path": "/data/zhidao", "extraction": {"rule": "zhidao"}},
//!     "news": {"path": "/data/news.jsonl", "extraction": {"rule": "text_field", "key": "body"}}
//! }
//! ```
use std::{
    collections::BTreeMap,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use lazy_static::lazy_static;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::extraction::{Concat, ExtractionRule, TextField, Zhidao, Zhihu};

lazy_static! {
    /// Corpora known without any registry file.
    pub static ref BUILTIN: BTreeMap<String, CorpusDescriptor> = {
        let mut m = BTreeMap::new();
        m.insert(
            "wikipedia".to_string(),
            CorpusDescriptor::new("data/wikipedia/wiki.txt", ExtractionRule::TextField(TextField::default())),
        );
        m.insert(
            "webtext".to_string(),
            CorpusDescriptor::new("data/webtext/data.json", ExtractionRule::TextField(TextField::default())),
        );
        m.insert(
            "baike".to_string(),
            CorpusDescriptor::new("data/baike/baike", ExtractionRule::Concat(Concat::default())),
        );
        m.insert(
            "zhihu".to_string(),
            CorpusDescriptor::new("data/zhihu/zhihu", ExtractionRule::Zhihu(Zhihu::default())),
        );
        m.insert(
            "zhidao".to_string(),
            CorpusDescriptor::new("data/zhidao/zhidao", ExtractionRule::Zhidao(Zhidao::default())),
        );
        m
    };
}

/// Static configuration of a corpus. Immutable during a run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusDescriptor {
    /// file or directory of files
    pub path: PathBuf,
    #[serde(default)]
    pub extraction: ExtractionRule,
}

impl CorpusDescriptor {
    pub fn new(path: impl Into<PathBuf>, extraction: ExtractionRule) -> Self {
        Self {
            path: path.into(),
            extraction,
        }
    }

    /// Replace the source path.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    /// Check that the source exists.
    pub fn validate(&self) -> Result<(), Error> {
        if self.path.exists() {
            Ok(())
        } else {
            Err(Error::Config(format!(
                "source path {:?} does not exist, set it with --src or in a registry file",
                self.path
            )))
        }
    }
}

/// Named corpora.
#[derive(Clone, Debug)]
pub struct Registry {
    corpora: BTreeMap<String, CorpusDescriptor>,
}

impl Default for Registry {
    /// Registry holding the [BUILTIN] corpora.
    fn default() -> Self {
        Self {
            corpora: BUILTIN.clone(),
        }
    }
}

impl Registry {
    /// Builtin corpora, overridden/extended by the ones declared in `path`.
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let file = File::open(path).map_err(|e| {
            Error::Config(format!("could not open registry file {:?}: {}", path, e))
        })?;
        let declared: BTreeMap<String, CorpusDescriptor> =
            serde_json::from_reader(BufReader::new(file))
                .map_err(|e| Error::Config(format!("invalid registry file {:?}: {}", path, e)))?;

        let mut registry = Self::default();
        for (name, descriptor) in declared {
            debug!("registry {:?}: declaring {} ({:?})", path, name, descriptor);
            registry.insert(name, descriptor);
        }
        Ok(registry)
    }

    pub fn insert(&mut self, name: impl Into<String>, descriptor: CorpusDescriptor) {
        self.corpora.insert(name.into(), descriptor);
    }

    pub fn get(&self, name: &str) -> Result<&CorpusDescriptor, Error> {
        self.corpora
            .get(name)
            .ok_or_else(|| Error::UnknownCorpus(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &CorpusDescriptor)> {
        self.corpora.iter()
    }
}
