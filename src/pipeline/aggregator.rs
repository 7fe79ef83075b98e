/*! Result aggregation.

Single consumer of the result channel. Pairs are written as they arrive, and the run is over
once every worker has sent its completion signal.
!*/
use crossbeam::channel::Receiver;
use log::{debug, error};
use serde::Serialize;

use crate::error::Error;
use crate::io::{Sink, SinkPair};
use crate::pipeline::message::Message;
use crate::progress::Progress;

/// Outcome of a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// lines handed to workers
    pub lines: u64,
    pub pairs: u64,
    /// lines that could not be parsed
    pub malformed: u64,
    pub completed_workers: usize,
}

pub struct Aggregator {
    nb_workers: usize,
}

impl Aggregator {
    pub fn new(nb_workers: usize) -> Self {
        Self { nb_workers }
    }

    /// Write incoming pairs until `nb_workers` completion signals have been received.
    ///
    /// Fails fast on sink errors and worker failures, dropping the receiver so that
    /// workers stop on their next send.
    pub fn run<P: Sink, T: Sink>(
        &self,
        results: Receiver<Message>,
        sinks: &mut SinkPair<P, T>,
        progress: &dyn Progress,
    ) -> Result<RunSummary, Error> {
        let mut summary = RunSummary::default();
        let mut remaining = self.nb_workers;

        while remaining > 0 {
            let message = results.recv().map_err(|_| {
                Error::Custom(format!(
                    "result channel closed with {} workers still running",
                    remaining
                ))
            })?;

            match message {
                Message::Pair(pair) => {
                    sinks.write_pair(&pair).map_err(|e| {
                        error!("could not write pair #{}: {}", summary.pairs, e);
                        e
                    })?;
                    summary.pairs += 1;
                    progress.pair_written();
                }
                Message::Complete(report) => {
                    debug!("worker {} completed: {:?}", report.worker, report);
                    summary.lines += report.lines;
                    summary.malformed += report.malformed;
                    summary.completed_workers += 1;
                    remaining -= 1;
                }
                Message::Failed { worker, reason } => {
                    error!("worker {} failed: {}", worker, reason);
                    return Err(Error::WorkerFailed { worker, reason });
                }
            }
        }

        Ok(summary)
    }
}
