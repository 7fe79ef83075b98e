//! Progress reporting.
//!
//! Purely observational: the reader calls [Progress::line_read] for each line sent to workers,
//! the aggregator calls [Progress::pair_written] for each pair written.
use std::sync::atomic::{AtomicU64, Ordering};

use log::info;

pub trait Progress: Sync {
    fn line_read(&self);
    fn pair_written(&self);
}

/// Does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn line_read(&self) {}
    fn pair_written(&self) {}
}

/// Logs (at info level) every `every` lines read and pairs written.
#[derive(Debug)]
pub struct LogProgress {
    lines: AtomicU64,
    pairs: AtomicU64,
    total_lines: Option<u64>,
    every: u64,
}

impl LogProgress {
    pub fn new(every: u64) -> Self {
        Self {
            lines: AtomicU64::new(0),
            pairs: AtomicU64::new(0),
            total_lines: None,
            every: every.max(1),
        }
    }

    /// Set the expected number of lines, enabling percentages.
    pub fn with_total(mut self, total_lines: u64) -> Self {
        self.total_lines = Some(total_lines);
        self
    }

    pub fn lines(&self) -> u64 {
        self.lines.load(Ordering::Relaxed)
    }

    pub fn pairs(&self) -> u64 {
        self.pairs.load(Ordering::Relaxed)
    }
}

impl Default for LogProgress {
    fn default() -> Self {
        Self::new(100_000)
    }
}

impl Progress for LogProgress {
    fn line_read(&self) {
        let nb = self.lines.fetch_add(1, Ordering::Relaxed) + 1;
        if nb % self.every == 0 {
            match self.total_lines {
                Some(total) if total > 0 => info!(
                    "read {}/{} lines ({:.1}%)",
                    nb,
                    total,
                    nb as f64 * 100.0 / total as f64
                ),
                _ => info!("read {} lines", nb),
            }
        }
    }

    fn pair_written(&self) {
        let nb = self.pairs.fetch_add(1, Ordering::Relaxed) + 1;
        if nb % self.every == 0 {
            info!("wrote {} pairs", nb);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters() {
        let p = LogProgress::new(2).with_total(3);
        p.line_read();
        p.line_read();
        p.line_read();
        p.pair_written();
        assert_eq!(p.lines(), 3);
        assert_eq!(p.pairs(), 1);
    }

    #[test]
    fn zero_interval_is_clamped() {
        let p = LogProgress::new(0);
        p.line_read();
        assert_eq!(p.lines(), 1);
    }
}
