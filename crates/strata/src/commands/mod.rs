pub mod init;
pub mod recent;
pub mod reconcile;
pub mod save;
pub mod show;
pub mod status;
pub mod version;

use crate::cli::Cli;
use std::path::PathBuf;
use std::sync::Arc;
use strata_core::{HierarchicalMemory, MemoryConfig};
use strata_summarize::{
    ChatCompletionSummarizer, ExtractiveSummarizer, Summarizer, SummarizerConfig,
};

/// Global flags shared by every command
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub dir: Option<PathBuf>,
    pub threshold: Option<usize>,
    pub offline: bool,
}

impl From<&Cli> for Options {
    fn from(cli: &Cli) -> Self {
        Self {
            dir: cli.dir.clone(),
            threshold: cli.threshold,
            offline: cli.offline,
        }
    }
}

impl Options {
    pub fn memory_config(&self) -> anyhow::Result<MemoryConfig> {
        let mut config = MemoryConfig::from_env()?;
        if let Some(dir) = &self.dir {
            config.base_dir = dir.clone();
        }
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        Ok(config)
    }

    pub fn summarizer(&self) -> Arc<dyn Summarizer> {
        let config = SummarizerConfig::from_env();
        if self.offline || config.api_key.is_none() {
            tracing::debug!("using offline extractive summarizer");
            return Arc::new(ExtractiveSummarizer::new());
        }

        match ChatCompletionSummarizer::new(config) {
            Ok(summarizer) => Arc::new(summarizer),
            Err(e) => {
                tracing::warn!(error = %e, "summarization API unavailable; using offline summarizer");
                Arc::new(ExtractiveSummarizer::new())
            }
        }
    }

    pub fn open_memory(&self) -> anyhow::Result<HierarchicalMemory> {
        Ok(HierarchicalMemory::open(
            self.memory_config()?,
            self.summarizer(),
        )?)
    }
}

#[cfg(test)]
pub(crate) fn offline_options(dir: &std::path::Path) -> Options {
    Options {
        dir: Some(dir.to_path_buf()),
        threshold: Some(3),
        offline: true,
    }
}
