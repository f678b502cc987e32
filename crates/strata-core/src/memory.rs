//! The memory instance: one record directory, one index, one writer

use crate::bootstrap::{reconcile, ReconcileReport};
use crate::compaction::Compactor;
use crate::{MemoryConfig, MemoryError, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use strata_store::{OperativeIndex, Record, RecordStore, SummaryPointer};
use strata_summarize::Summarizer;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Leveled memory store
///
/// The cached index sits behind an async mutex held for the whole
/// save-and-compact sequence, so passes never interleave. Mutations are made
/// on a working copy that replaces the cache only once it has been flushed;
/// a failed save instead reconciles the cache against the records on disk.
pub struct HierarchicalMemory {
    config: MemoryConfig,
    records: RecordStore,
    index: Mutex<OperativeIndex>,
    summarizer: Arc<dyn Summarizer>,
}

impl HierarchicalMemory {
    /// Open (or create) the memory directory and reconcile its index
    pub fn open(config: MemoryConfig, summarizer: Arc<dyn Summarizer>) -> Result<Self> {
        config.validate()?;

        let records = RecordStore::open(&config.base_dir).map_err(|source| MemoryError::Init {
            path: config.base_dir.clone(),
            source,
        })?;

        let index_path = records.paths().index_file();
        let (mut index, rebuilt) = match OperativeIndex::load(&index_path) {
            Ok(index) => (index, false),
            Err(e) if e.is_malformed() => {
                warn!(error = %e, "operative index unreadable; rebuilding from records");
                (OperativeIndex::empty(&index_path), true)
            }
            Err(e) => return Err(e.into()),
        };

        let mut report = reconcile(&records, &mut index)?;
        report.rebuilt = rebuilt;
        index.flush()?;
        log_report(&report);

        Ok(Self {
            config,
            records,
            index: Mutex::new(index),
            summarizer,
        })
    }

    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    /// Store new content at level 0 and compact; returns the record id
    pub async fn save(&self, content: Value) -> Result<String> {
        let mut cached = self.index.lock().await;
        let compactor = Compactor::new(&self.records, self.summarizer.as_ref(), &self.config);

        let record = Record::message(content.clone());
        let id = self.records.persist(&record)?;
        let description = compactor.describe(&content).await;

        let mut working = cached.clone();
        working.append(SummaryPointer::message(
            0,
            id.as_str(),
            record.timestamp(),
            description,
        ));
        let outcome: Result<_> = async {
            let promotions = compactor.compact(&mut working).await?;
            working.flush()?;
            Ok(promotions)
        }
        .await;

        match outcome {
            Ok(promotions) => {
                *cached = working;
                info!(%id, promotions = promotions.len(), "saved memory");
                Ok(id)
            }
            Err(e) => {
                // records written before the failure stay on disk
                self.resync(&mut cached);
                Err(e)
            }
        }
    }

    /// Realign the cache with the record files after a failed save
    ///
    /// The durable index is left as it was; the next successful flush or
    /// startup reconciliation brings it in line.
    fn resync(&self, cached: &mut OperativeIndex) {
        let mut rebuilt = cached.clone();
        match reconcile(&self.records, &mut rebuilt) {
            Ok(report) => {
                log_report(&report);
                *cached = rebuilt;
            }
            Err(e) => warn!(error = %e, "could not reconcile cache after failed save"),
        }
    }

    /// The last `limit` active entries, oldest first
    pub async fn recent(&self, limit: usize) -> Vec<SummaryPointer> {
        self.index.lock().await.recent(limit).to_vec()
    }

    /// Load one record by level and id
    pub fn load(&self, level: u32, id: &str) -> Result<Record> {
        Ok(self.records.load(level, id)?)
    }

    /// Load the record an index entry points to
    pub fn load_pointer(&self, pointer: &SummaryPointer) -> Result<Record> {
        Ok(self.records.load_reference(&pointer.reference)?)
    }

    /// Re-run startup reconciliation against the files on disk
    pub async fn reconcile(&self) -> Result<ReconcileReport> {
        let mut cached = self.index.lock().await;
        let mut working = cached.clone();
        let report = reconcile(&self.records, &mut working)?;
        working.flush()?;
        *cached = working;
        log_report(&report);
        Ok(report)
    }

    /// Active entry count per level
    pub async fn level_counts(&self) -> BTreeMap<u32, usize> {
        self.index.lock().await.level_counts()
    }

    /// Copy of every active entry, in index order
    pub async fn entries(&self) -> Vec<SummaryPointer> {
        self.index.lock().await.entries().to_vec()
    }
}

fn log_report(report: &ReconcileReport) {
    if report.changed() || report.skipped > 0 {
        info!(
            recovered = report.recovered,
            stale = report.dropped_stale,
            archived = report.dropped_archived,
            duplicates = report.dropped_duplicates,
            normalized = report.normalized,
            skipped = report.skipped,
            rebuilt = report.rebuilt,
            "reconciled operative index"
        );
    }
}
