#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use strata_core::{HierarchicalMemory, MemoryConfig};
use strata_store::{Record, RecordStore, SummaryPointer};
use strata_summarize::{ExtractiveSummarizer, SummarizeError, Summarizer};

pub fn open_memory(dir: &Path, threshold: usize) -> HierarchicalMemory {
    open_with(dir, threshold, Arc::new(ExtractiveSummarizer::new()))
}

pub fn open_with(
    dir: &Path,
    threshold: usize,
    summarizer: Arc<dyn Summarizer>,
) -> HierarchicalMemory {
    let config = MemoryConfig::new(dir)
        .with_threshold(threshold)
        .with_summarizer_timeout(Duration::from_millis(200));
    HierarchicalMemory::open(config, summarizer).unwrap()
}

/// Always fails, like an unreachable endpoint
pub struct FailingSummarizer;

#[async_trait]
impl Summarizer for FailingSummarizer {
    async fn describe(&self, _content: &Value) -> strata_summarize::Result<String> {
        Err(SummarizeError::MalformedResponse("boom".to_string()))
    }

    async fn summarize_period(&self, _batch: &[Record]) -> strata_summarize::Result<String> {
        Err(SummarizeError::MalformedResponse("boom".to_string()))
    }
}

/// Never answers within any reasonable timeout
pub struct StalledSummarizer;

#[async_trait]
impl Summarizer for StalledSummarizer {
    async fn describe(&self, _content: &Value) -> strata_summarize::Result<String> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok("too late".to_string())
    }

    async fn summarize_period(&self, _batch: &[Record]) -> strata_summarize::Result<String> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok("too late".to_string())
    }
}

/// Records the size of every batch it is asked to summarize
#[derive(Default)]
pub struct RecordingSummarizer {
    pub periods: AtomicUsize,
    pub batches: std::sync::Mutex<Vec<Vec<Record>>>,
}

#[async_trait]
impl Summarizer for RecordingSummarizer {
    async fn describe(&self, content: &Value) -> strata_summarize::Result<String> {
        Ok(format!("desc:{}", content.as_str().unwrap_or("?")))
    }

    async fn summarize_period(&self, batch: &[Record]) -> strata_summarize::Result<String> {
        let n = self.periods.fetch_add(1, Ordering::SeqCst) + 1;
        self.batches.lock().unwrap().push(batch.to_vec());
        Ok(format!("period #{n}"))
    }
}

/// Leaf contents reachable from `pointers` by following references down
pub fn leaf_contents(dir: &Path, pointers: &[SummaryPointer]) -> Vec<Value> {
    let store = RecordStore::open(dir).unwrap();
    let mut leaves = Vec::new();
    let mut stack: Vec<SummaryPointer> = pointers.iter().rev().cloned().collect();
    while let Some(pointer) = stack.pop() {
        match store.load_reference(&pointer.reference).unwrap() {
            Record::Message(m) => leaves.push(m.content),
            Record::Period(p) => stack.extend(p.summaries.into_iter().rev()),
        }
    }
    leaves
}

pub fn assert_bounded(counts: &std::collections::BTreeMap<u32, usize>, threshold: usize) {
    for (level, count) in counts {
        assert!(
            *count < threshold,
            "level {} holds {} entries, threshold {}",
            level,
            count,
            threshold
        );
    }
}
