/*! Extraction workers.

Each worker pulls lines from the shared task channel until it gets a [Task::Stop]
(or the channel is closed), and pushes every extracted pair to the result channel.
Workers also stop as soon as the cancel channel is disconnected, which happens when the
aggregator is done, so that a failed run does not keep consuming its input.

The completion signal is sent by the [Completion] guard when the worker returns or unwinds,
so a worker can never disappear without the aggregator noticing.
!*/
use crossbeam::channel::{select, Receiver, Sender, TryRecvError};
use log::{debug, error};

use crate::extraction::{parse_record, Extract, ExtractionRule};
use crate::pipeline::message::{Message, Task, WorkerReport};
use crate::sample::ExtractedPair;
use crate::tokenizer::Tokenizer;

/// Sends the completion signal (or a failure) on drop.
struct Completion {
    report: WorkerReport,
    failure: Option<String>,
    results: Sender<Message>,
}

impl Completion {
    fn new(worker: usize, results: Sender<Message>) -> Self {
        Self {
            report: WorkerReport::new(worker),
            failure: None,
            results,
        }
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        let worker = self.report.worker;
        let message = match self.failure.take() {
            Some(reason) => Message::Failed { worker, reason },
            None if std::thread::panicking() => Message::Failed {
                worker,
                reason: "worker panicked".to_string(),
            },
            None => Message::Complete(self.report),
        };

        // the aggregator may already be gone if the run failed.
        if self.results.send(message).is_err() {
            debug!("worker {}: aggregator is gone", worker);
        }
    }
}

pub struct Worker<'a> {
    id: usize,
    rule: &'a ExtractionRule,
    tokenizer: Option<&'a dyn Tokenizer>,
    tasks: Receiver<Task>,
    results: Sender<Message>,
    cancel: Receiver<()>,
}

impl<'a> Worker<'a> {
    /// `tokenizer` is only used when set: a worker without tokenizer emits text samples.
    ///
    /// Nothing is ever sent on `cancel`: the worker stops once its sender is dropped.
    pub fn new(
        id: usize,
        rule: &'a ExtractionRule,
        tokenizer: Option<&'a dyn Tokenizer>,
        tasks: Receiver<Task>,
        results: Sender<Message>,
        cancel: Receiver<()>,
    ) -> Self {
        Self {
            id,
            rule,
            tokenizer,
            tasks,
            results,
            cancel,
        }
    }

    /// Wait for the next line. `None` on stop, closed task channel or cancellation.
    fn next_line(&self) -> Option<String> {
        if let Err(TryRecvError::Disconnected) = self.cancel.try_recv() {
            debug!("worker {}: cancelled", self.id);
            return None;
        }

        select! {
            recv(self.tasks) -> task => match task {
                Ok(Task::Line(line)) => Some(line),
                Ok(Task::Stop) | Err(_) => None,
            },
            recv(self.cancel) -> _ => {
                debug!("worker {}: cancelled", self.id);
                None
            }
        }
    }

    /// Parse and extract a line.
    ///
    /// Returns `None` for malformed lines. Blank lines yield no pairs.
    fn extract(&self, line: &str) -> Option<Vec<ExtractedPair>> {
        if line.trim().is_empty() {
            return Some(Vec::new());
        }

        match parse_record(line) {
            Ok(record) => Some(self.rule.extract(&record)),
            Err(e) => {
                debug!("worker {}: skipping malformed line: {}", self.id, e);
                None
            }
        }
    }

    /// Process tasks until stopped.
    pub fn run(self) {
        let mut completion = Completion::new(self.id, self.results.clone());

        // a closed task channel means the reader stopped early; it is handled like Stop.
        while let Some(line) = self.next_line() {
            completion.report.lines += 1;

            let pairs = match self.extract(&line) {
                Some(pairs) => pairs,
                None => {
                    completion.report.malformed += 1;
                    continue;
                }
            };

            for pair in pairs {
                let pair = match self.tokenizer {
                    Some(tokenizer) => match pair.tokenize(tokenizer) {
                        Ok(pair) => pair,
                        Err(e) => {
                            error!("worker {}: {}", self.id, e);
                            completion.failure = Some(e.to_string());
                            return;
                        }
                    },
                    None => pair,
                };

                if self.results.send(Message::Pair(pair)).is_err() {
                    debug!("worker {}: result channel closed, stopping", self.id);
                    return;
                }
                completion.report.pairs += 1;
            }
        }

        debug!(
            "worker {} done: {} lines, {} pairs",
            self.id, completion.report.lines, completion.report.pairs
        );
    }
}

#[cfg(test)]
mod tests {
    use crossbeam::channel::{bounded, unbounded};

    use super::*;
    use crate::error::Error;
    use crate::extraction::TextField;
    use crate::sample::Sample;
    use crate::tokenizer::ByteTokenizer;

    struct FailingTokenizer;

    impl Tokenizer for FailingTokenizer {
        fn encode(&self, _text: &str) -> Result<Vec<u32>, Error> {
            Err(Error::Tokenizer("broken vocabulary".to_string()))
        }
    }

    fn run_worker(
        lines: &[&str],
        tokenizer: Option<&dyn Tokenizer>,
        stop: bool,
    ) -> Vec<Message> {
        let rule = ExtractionRule::TextField(TextField::default());
        let (task_tx, task_rx) = unbounded();
        let (result_tx, result_rx) = unbounded();
        let (_cancel_tx, cancel_rx) = bounded(0);
        for line in lines {
            task_tx.send(Task::Line(line.to_string())).unwrap();
        }
        if stop {
            task_tx.send(Task::Stop).unwrap();
        } else {
            drop(task_tx);
        }

        Worker::new(0, &rule, tokenizer, task_rx, result_tx, cancel_rx).run();
        result_rx.try_iter().collect()
    }

    #[test]
    fn pairs_then_completion() {
        let messages = run_worker(
            &[r#"{"text": "a"}"#, "not json", "", r#"{"other": 1}"#, r#"{"text": "b"}"#],
            None,
            true,
        );
        assert_eq!(
            messages,
            vec![
                Message::Pair(ExtractedPair::new("", "a")),
                Message::Pair(ExtractedPair::new("", "b")),
                Message::Complete(WorkerReport {
                    worker: 0,
                    lines: 5,
                    malformed: 1,
                    pairs: 2
                }),
            ]
        );
    }

    #[test]
    fn closed_channel_acts_as_stop() {
        let messages = run_worker(&[r#"{"text": "a"}"#], None, false);
        assert_eq!(messages.len(), 2);
        assert!(matches!(messages[1], Message::Complete(_)));
    }

    #[test]
    fn cancelled_worker_leaves_remaining_tasks() {
        let rule = ExtractionRule::TextField(TextField::default());
        let (task_tx, task_rx) = unbounded();
        let (result_tx, result_rx) = unbounded();
        let (cancel_tx, cancel_rx) = bounded::<()>(0);
        for _ in 0..3 {
            task_tx.send(Task::Line(r#"{"text": "a"}"#.to_string())).unwrap();
        }
        drop(cancel_tx);

        Worker::new(0, &rule, None, task_rx.clone(), result_tx, cancel_rx).run();
        assert_eq!(task_tx.len(), 3);
        let messages: Vec<Message> = result_rx.try_iter().collect();
        assert_eq!(messages, vec![Message::Complete(WorkerReport::new(0))]);
    }

    #[test]
    fn tokenized_output() {
        let messages = run_worker(&[r#"{"text": "ab"}"#], Some(&ByteTokenizer), true);
        assert_eq!(
            messages[0],
            Message::Pair(ExtractedPair {
                prompt: Sample::Tokens(vec![]),
                response: Sample::Tokens(vec![97, 98]),
            })
        );
    }

    #[test]
    fn tokenizer_error_fails_worker() {
        let messages = run_worker(
            &[r#"{"text": "ab"}"#, r#"{"text": "cd"}"#],
            Some(&FailingTokenizer),
            true,
        );
        assert_eq!(messages.len(), 1);
        assert!(matches!(&messages[0], Message::Failed { worker: 0, reason } if reason.contains("broken")));
    }
}
