//! Pipeline trait.
use crate::error::Error;

/// This trait is implemented by runnable pipelines,
/// and is generic over the return type so that
/// a pipeline can report what it did.
pub trait Pipeline<T> {
    fn run(&self) -> Result<T, Error>;
}
