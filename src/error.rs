//! Error enum
use std::fmt;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Serde(serde_json::Error),
    /// Invalid run configuration (bad paths, zero workers...).
    /// Always raised before any processing starts.
    Config(String),
    UnknownCorpus(String),
    Tokenizer(String),
    /// A worker stopped without emitting its completion signal.
    WorkerFailed { worker: usize, reason: String },
    Custom(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "io error: {}", e),
            Error::Serde(e) => write!(f, "serialization error: {}", e),
            Error::Config(msg) => write!(f, "configuration error: {}", msg),
            Error::UnknownCorpus(name) => write!(f, "unknown corpus: {}", name),
            Error::Tokenizer(msg) => write!(f, "tokenizer error: {}", msg),
            Error::WorkerFailed { worker, reason } => {
                write!(f, "worker {} failed: {}", worker, reason)
            }
            Error::Custom(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Serde(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::Io(e)
    }
}

impl From<String> for Error {
    fn from(s: String) -> Error {
        Error::Custom(s)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Error {
        Error::Serde(e)
    }
}
