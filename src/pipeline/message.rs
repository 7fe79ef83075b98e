//! Channel messages.
use crate::sample::ExtractedPair;

/// Reader → workers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    Line(String),
    /// Sent once per worker after the last line.
    Stop,
}

/// Workers → aggregator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Pair(ExtractedPair),
    /// Completion signal, sent exactly once by each worker that finished normally.
    Complete(WorkerReport),
    /// Sent instead of [Message::Complete] by a worker that could not finish.
    Failed { worker: usize, reason: String },
}

/// What a worker did, sent along its completion signal.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WorkerReport {
    pub worker: usize,
    pub lines: u64,
    pub malformed: u64,
    pub pairs: u64,
}

impl WorkerReport {
    pub fn new(worker: usize) -> Self {
        Self {
            worker,
            ..Default::default()
        }
    }
}
