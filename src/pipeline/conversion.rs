/*! Corpus conversion

Fan-out/fan-in conversion of a corpus into prompt/text streams:

```text
reader ──tasks──> worker 0..N ──results──> aggregator ──> sinks
```

- The reader thread streams lines into a bounded task channel, then sends one [Task::Stop] per worker.
- Workers extract pairs and push them into a bounded result channel.
- The aggregator runs on the calling thread, writes pairs in arrival order and returns
  once every worker has signaled its completion.
- When the aggregator returns, the cancel channel is disconnected. On a failed run this
  stops the reader and the workers without draining the rest of the input.

Pairs from different lines may come out in any order, but a pair is never split
and pairs of a single line keep their relative order.
!*/
use std::path::PathBuf;

use crossbeam::channel::{bounded, select, Receiver, Sender};
use log::{debug, error, info, warn};

use crate::corpora::CorpusDescriptor;
use crate::error::Error;
use crate::io::{count_lines, JsonlSink, RecordSource, Sink, SinkPair};
use crate::pipeline::aggregator::{Aggregator, RunSummary};
use crate::pipeline::config::PipelineConfig;
use crate::pipeline::message::Task;
use crate::pipeline::pipeline::Pipeline;
use crate::pipeline::worker::Worker;
use crate::progress::{LogProgress, Progress};
use crate::tokenizer::Tokenizer;

pub struct Conversion<'a> {
    descriptor: CorpusDescriptor,
    config: PipelineConfig,
    tokenizer: Option<&'a dyn Tokenizer>,
}

impl<'a> Conversion<'a> {
    pub fn new(descriptor: CorpusDescriptor, config: PipelineConfig) -> Self {
        Self {
            descriptor,
            config,
            tokenizer: None,
        }
    }

    /// Set the tokenizer. It is only used if tokenization is enabled in the config.
    pub fn with_tokenizer(mut self, tokenizer: &'a dyn Tokenizer) -> Self {
        self.tokenizer = Some(tokenizer);
        self
    }

    pub fn descriptor(&self) -> &CorpusDescriptor {
        &self.descriptor
    }

    /// Resolve the tokenizer that workers will use.
    fn active_tokenizer(&self) -> Result<Option<&'a dyn Tokenizer>, Error> {
        match (self.config.tokenize(), self.tokenizer) {
            (true, None) => Err(Error::Config(
                "tokenization is enabled but no tokenizer was provided".to_string(),
            )),
            (true, Some(tokenizer)) => Ok(Some(tokenizer)),
            (false, _) => Ok(None),
        }
    }

    /// Stream every line of `source` to the workers, then one stop token per worker.
    ///
    /// Stops early when `cancel` is disconnected. Returns the number of lines sent.
    fn feed(
        source: &RecordSource,
        tasks: Sender<Task>,
        cancel: Receiver<()>,
        nb_workers: usize,
        progress: &dyn Progress,
    ) -> Result<u64, Error> {
        let mut nb_lines = 0;
        for line in source.lines() {
            let line = line.map_err(|e| {
                error!("could not read source: {}", e);
                e
            })?;
            select! {
                send(tasks, Task::Line(line)) -> res => {
                    if res.is_err() {
                        warn!("no worker left, stopping reading");
                        return Ok(nb_lines);
                    }
                }
                recv(cancel) -> _ => {
                    debug!("run cancelled after {} lines, stopping reading", nb_lines);
                    return Ok(nb_lines);
                }
            }
            nb_lines += 1;
            progress.line_read();
        }

        for _ in 0..nb_workers {
            select! {
                send(tasks, Task::Stop) -> res => {
                    if res.is_err() {
                        break;
                    }
                }
                recv(cancel) -> _ => break,
            }
        }
        Ok(nb_lines)
    }

    /// Run the conversion, writing into `sinks`.
    ///
    /// Configuration is checked before any thread is started.
    /// On error, whatever has been written to `sinks` is incomplete and should be discarded.
    pub fn run_with<P: Sink, T: Sink>(
        &self,
        sinks: &mut SinkPair<P, T>,
        progress: &dyn Progress,
    ) -> Result<RunSummary, Error> {
        self.descriptor.validate()?;
        let tokenizer = self.active_tokenizer()?;
        let source = RecordSource::new(&self.descriptor.path)?;

        let nb_workers = self.config.workers();
        let capacity = self.config.channel_capacity();
        let rule = &self.descriptor.extraction;
        info!(
            "converting {:?} ({} files) with {} workers, rule {}",
            self.descriptor.path,
            source.paths().len(),
            nb_workers,
            rule.name()
        );

        let (task_tx, task_rx) = bounded(capacity);
        let (result_tx, result_rx) = bounded(capacity);
        // never sent on: dropping the sender cancels the reader and the workers.
        let (cancel_tx, cancel_rx) = bounded::<()>(0);

        let outcome = crossbeam::thread::scope(|s| {
            let workers: Vec<_> = (0..nb_workers)
                .map(|id| {
                    let worker = Worker::new(
                        id,
                        rule,
                        tokenizer,
                        task_rx.clone(),
                        result_tx.clone(),
                        cancel_rx.clone(),
                    );
                    s.spawn(move |_| worker.run())
                })
                .collect();
            // only workers may hold these, or channel closing would never be detected.
            drop(task_rx);
            drop(result_tx);

            let source = &source;
            let reader =
                s.spawn(move |_| Self::feed(source, task_tx, cancel_rx, nb_workers, progress));

            let aggregated = Aggregator::new(nb_workers).run(result_rx, sinks, progress);
            drop(cancel_tx);
            let read = reader
                .join()
                .unwrap_or_else(|_| Err(Error::Custom("reader thread panicked".to_string())));

            // panics were already reported to the aggregator as worker failures.
            for handle in workers {
                if handle.join().is_err() {
                    debug!("joined a panicked worker");
                }
            }

            (aggregated, read)
        });

        let (aggregated, read) = outcome
            .map_err(|_| Error::Custom("a pipeline thread panicked".to_string()))?;

        let summary = aggregated?;
        let nb_lines = read?;
        if summary.lines != nb_lines {
            return Err(Error::Custom(format!(
                "{} lines read but {} processed",
                nb_lines, summary.lines
            )));
        }

        sinks.finish()?;

        if summary.malformed > 0 {
            warn!("skipped {} malformed lines", summary.malformed);
        }
        info!(
            "done: {} lines, {} pairs, {} workers completed",
            summary.lines, summary.pairs, summary.completed_workers
        );
        Ok(summary)
    }
}

/// Conversion of a corpus into `<dst>/<name>.prompt.jsonl` and `<dst>/<name>.text.jsonl`
/// (`.jsonl.gz` when compressed), logging progress.
pub struct ConvertToFiles<'a> {
    name: String,
    dst: PathBuf,
    gzip: bool,
    conversion: Conversion<'a>,
}

impl<'a> ConvertToFiles<'a> {
    pub fn new(name: &str, dst: PathBuf, gzip: bool, conversion: Conversion<'a>) -> Self {
        Self {
            name: name.to_string(),
            dst,
            gzip,
            conversion,
        }
    }

    /// Paths of the prompt and text files.
    pub fn output_paths(&self) -> (PathBuf, PathBuf) {
        let extension = if self.gzip { "jsonl.gz" } else { "jsonl" };
        (
            self.dst.join(format!("{}.prompt.{}", self.name, extension)),
            self.dst.join(format!("{}.text.{}", self.name, extension)),
        )
    }
}

impl<'a> Pipeline<RunSummary> for ConvertToFiles<'a> {
    fn run(&self) -> Result<RunSummary, Error> {
        // fail before creating anything
        self.conversion.descriptor().validate()?;

        if !self.dst.exists() {
            warn!("Destination {:?} does not exist. Creating", self.dst);
            std::fs::create_dir_all(&self.dst)?;
        }
        if !self.dst.is_dir() {
            return Err(Error::Config(format!(
                "destination has to be a directory: {:?}",
                self.dst
            )));
        }

        let source = RecordSource::new(&self.conversion.descriptor().path)?;
        let total = count_lines(source.paths())?;
        info!("{} lines to process", total);
        let progress = LogProgress::default().with_total(total);

        let (prompt_path, text_path) = self.output_paths();
        let mut sinks = SinkPair::new(
            JsonlSink::create(&prompt_path, self.gzip)?,
            JsonlSink::create(&text_path, self.gzip)?,
        );

        self.conversion.run_with(&mut sinks, &progress)
    }
}
