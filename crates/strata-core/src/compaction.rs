//! Level-by-level promotion of the oldest active entries

use crate::{MemoryConfig, Result};
use serde_json::Value;
use std::future::Future;
use strata_store::{OperativeIndex, Record, RecordStore, StoreError, SummaryPointer};
use strata_summarize::{Summarizer, DESCRIPTION_PLACEHOLDER, PERIOD_PLACEHOLDER};
use tracing::{info, warn};

/// One batch moved up a level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Promotion {
    pub from_level: u32,
    pub to_level: u32,
    /// Id of the new record at `to_level`
    pub id: String,
    pub members: usize,
}

/// Runs compaction passes over an index
pub struct Compactor<'a> {
    records: &'a RecordStore,
    summarizer: &'a dyn Summarizer,
    config: &'a MemoryConfig,
}

impl<'a> Compactor<'a> {
    pub fn new(
        records: &'a RecordStore,
        summarizer: &'a dyn Summarizer,
        config: &'a MemoryConfig,
    ) -> Self {
        Self {
            records,
            summarizer,
            config,
        }
    }

    /// Short description for a new entry; never fails
    pub async fn describe(&self, content: &Value) -> String {
        self.bounded(
            "short description",
            self.summarizer.describe(content),
            DESCRIPTION_PLACEHOLDER,
        )
        .await
    }

    /// Promote from level 0 upward until every level below `max_depth` is
    /// under the threshold
    pub async fn compact(&self, index: &mut OperativeIndex) -> Result<Vec<Promotion>> {
        let threshold = self.config.threshold;
        let mut promotions = Vec::new();

        for level in 0..self.config.max_depth {
            while index.active_count_at_level(level) >= threshold {
                promotions.push(self.promote(index, level).await?);
            }
        }

        let top = index.active_count_at_level(self.config.max_depth);
        if top >= threshold {
            warn!(
                level = self.config.max_depth,
                active = top,
                threshold,
                "top level over threshold; leaving it as is"
            );
        }
        Ok(promotions)
    }

    async fn promote(&self, index: &mut OperativeIndex, level: u32) -> Result<Promotion> {
        let selected = index.oldest_at_level(level, self.config.threshold);
        let batch = self.load_batch(&selected)?;
        let summary = self
            .bounded(
                "period summary",
                self.summarizer.summarize_period(&batch),
                PERIOD_PLACEHOLDER,
            )
            .await;

        let next = level + 1;
        let start = selected.first().and_then(|p| p.span().0);
        let end = selected.last().and_then(|p| p.span().1);
        let id = self
            .records
            .persist(&Record::period(next, selected.clone(), summary.clone()))?;

        index.remove_many(level, selected.iter().map(|p| p.id.as_str()));
        index.append(SummaryPointer::period(next, &id, start, end, summary));

        info!(from = level, to = next, %id, members = selected.len(), "promoted batch");
        Ok(Promotion {
            from_level: level,
            to_level: next,
            id,
            members: selected.len(),
        })
    }

    /// Backing records of `pointers`; unreadable ones are left out
    fn load_batch(&self, pointers: &[SummaryPointer]) -> Result<Vec<Record>> {
        let mut batch = Vec::with_capacity(pointers.len());
        for pointer in pointers {
            match self.records.load_reference(&pointer.reference) {
                Ok(record) => batch.push(record),
                Err(e @ StoreError::Io { .. }) => return Err(e.into()),
                Err(e) => {
                    warn!(reference = %pointer.reference, error = %e, "skipping unreadable record");
                }
            }
        }
        Ok(batch)
    }

    async fn bounded<F>(&self, what: &str, call: F, placeholder: &str) -> String
    where
        F: Future<Output = strata_summarize::Result<String>>,
    {
        match tokio::time::timeout(self.config.summarizer_timeout, call).await {
            Ok(Ok(text)) if !text.trim().is_empty() => text,
            Ok(Ok(_)) => {
                warn!("{what} came back empty; using placeholder");
                placeholder.to_string()
            }
            Ok(Err(e)) => {
                warn!(error = %e, "{what} failed; using placeholder");
                placeholder.to_string()
            }
            Err(_) => {
                warn!(timeout = ?self.config.summarizer_timeout, "{what} timed out; using placeholder");
                placeholder.to_string()
            }
        }
    }
}
