//! Configuration for leveled memory

use crate::{MemoryError, Result};
use std::path::PathBuf;
use std::time::Duration;
use strata_store::MemoryPaths;

/// Memory configuration
#[derive(Debug, Clone)]
pub struct MemoryConfig {
    /// Directory holding operative.json and the record files
    pub base_dir: PathBuf,

    /// Active entries a level may hold before its oldest batch is promoted
    pub threshold: usize,

    /// Highest level promotions can reach
    pub max_depth: u32,

    /// Bound on every summarizer call
    pub summarizer_timeout: Duration,
}

impl MemoryConfig {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            threshold: 10,
            max_depth: 10,
            summarizer_timeout: Duration::from_secs(30),
        }
    }

    /// Defaults overlaid with `STRATA_MEMORY_DIR`, `STRATA_THRESHOLD`,
    /// `STRATA_MAX_DEPTH` and `STRATA_SUMMARY_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(dir) = std::env::var("STRATA_MEMORY_DIR") {
            config.base_dir = PathBuf::from(dir);
        }
        if let Some(threshold) = env_number("STRATA_THRESHOLD")? {
            config.threshold = threshold as usize;
        }
        if let Some(depth) = env_number("STRATA_MAX_DEPTH")? {
            config.max_depth = u32::try_from(depth)
                .map_err(|_| MemoryError::Config(format!("STRATA_MAX_DEPTH too large: {depth}")))?;
        }
        if let Some(secs) = env_number("STRATA_SUMMARY_TIMEOUT_SECS")? {
            config.summarizer_timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_summarizer_timeout(mut self, timeout: Duration) -> Self {
        self.summarizer_timeout = timeout;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.threshold < 2 {
            return Err(MemoryError::Config(format!(
                "threshold must be at least 2, got {}",
                self.threshold
            )));
        }
        if self.max_depth == 0 {
            return Err(MemoryError::Config("max_depth must be positive".to_string()));
        }
        if self.summarizer_timeout.is_zero() {
            return Err(MemoryError::Config(
                "summarizer timeout must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        let base_dir = MemoryPaths::default_base_dir().unwrap_or_else(|_| PathBuf::from("memory"));
        Self::new(base_dir)
    }
}

fn env_number(key: &str) -> Result<Option<u64>> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| MemoryError::Config(format!("{key} is not a number: {raw:?}"))),
        Err(_) => Ok(None),
    }
}
