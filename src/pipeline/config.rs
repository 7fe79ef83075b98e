//! Pipeline configuration.
use crate::error::Error;

/// Number of workers used when none is specified.
pub const DEFAULT_WORKERS: usize = 40;
/// Capacity of both the task and the result channels.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    workers: usize,
    channel_capacity: usize,
    tokenize: bool,
}

impl PipelineConfig {
    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn channel_capacity(&self) -> usize {
        self.channel_capacity
    }

    pub fn tokenize(&self) -> bool {
        self.tokenize
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            tokenize: false,
        }
    }
}

#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    workers: Option<usize>,
    channel_capacity: Option<usize>,
    tokenize: Option<bool>,
}

impl PipelineConfigBuilder {
    /// Build, resorting to the following defaults if not set:
    /// - workers: [DEFAULT_WORKERS]
    /// - channel_capacity: [DEFAULT_CHANNEL_CAPACITY]
    /// - tokenize: false
    ///
    /// Errors on zero workers or zero capacity.
    pub fn build(&self) -> Result<PipelineConfig, Error> {
        let workers = self.workers.unwrap_or(DEFAULT_WORKERS);
        let channel_capacity = self.channel_capacity.unwrap_or(DEFAULT_CHANNEL_CAPACITY);

        if workers == 0 {
            return Err(Error::Config("at least one worker is needed".to_string()));
        }
        if channel_capacity == 0 {
            return Err(Error::Config(
                "channel capacity must be greater than 0".to_string(),
            ));
        }

        Ok(PipelineConfig {
            workers,
            channel_capacity,
            tokenize: self.tokenize.unwrap_or(false),
        })
    }

    pub fn workers(&mut self, workers: usize) -> &mut Self {
        self.workers = Some(workers);
        self
    }

    pub fn channel_capacity(&mut self, capacity: usize) -> &mut Self {
        self.channel_capacity = Some(capacity);
        self
    }

    pub fn tokenize(&mut self, tokenize: bool) -> &mut Self {
        self.tokenize = Some(tokenize);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = PipelineConfigBuilder::default().build().unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.workers(), 40);
        assert!(!config.tokenize());
    }

    #[test]
    fn set_values() {
        let config = PipelineConfigBuilder::default()
            .workers(4)
            .channel_capacity(8)
            .tokenize(true)
            .build()
            .unwrap();
        assert_eq!(config.workers(), 4);
        assert_eq!(config.channel_capacity(), 8);
        assert!(config.tokenize());
    }

    #[test]
    fn zero_workers() {
        let res = PipelineConfigBuilder::default().workers(0).build();
        assert!(matches!(res, Err(Error::Config(_))));
    }

    #[test]
    fn zero_capacity() {
        let res = PipelineConfigBuilder::default().channel_capacity(0).build();
        assert!(matches!(res, Err(Error::Config(_))));
    }
}
