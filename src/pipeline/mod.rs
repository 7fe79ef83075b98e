//! Conversion pipeline.
//!
//! A single reader feeds a fixed pool of [worker::Worker]s through a bounded channel,
//! and a single [aggregator::Aggregator] writes their results.
//! [Conversion] wires everything together, and [ConvertToFiles] provides a light
//! [pipeline::Pipeline] writing to JSON-lines files.
mod aggregator;
mod config;
mod conversion;
pub mod message;
#[allow(clippy::module_inception)]
pub mod pipeline;
mod worker;

pub use aggregator::{Aggregator, RunSummary};
pub use config::{PipelineConfig, PipelineConfigBuilder, DEFAULT_CHANNEL_CAPACITY, DEFAULT_WORKERS};
pub use conversion::{Conversion, ConvertToFiles};
pub use pipeline::Pipeline;
pub use worker::Worker;
