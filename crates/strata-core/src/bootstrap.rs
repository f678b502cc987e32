//! Startup reconciliation of the operative index against record files
//!
//! Record files are the source of truth. An index entry is kept only when its
//! record exists and no promoted record has archived it; every record that
//! is neither indexed nor archived gets a pointer synthesized from its
//! contents.

use crate::Result;
use std::collections::{BTreeMap, HashSet};
use strata_store::{
    parse_record_filename, reference_basename, OperativeIndex, Record, RecordStore,
    SummaryPointer,
};
use strata_summarize::ExtractiveSummarizer;
use tracing::{debug, warn};

type RecordKey = (u32, String);

/// What a reconciliation pass changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Pointers synthesized for records missing from the index
    pub recovered: usize,
    /// Entries whose record file no longer exists
    pub dropped_stale: usize,
    /// Entries already embedded in a promoted record
    pub dropped_archived: usize,
    pub dropped_duplicates: usize,
    /// Path-qualified references rewritten to bare filenames
    pub normalized: usize,
    /// Record files that could not be read
    pub skipped: usize,
    /// The index file was unreadable and rebuilt from records
    pub rebuilt: bool,
}

impl ReconcileReport {
    pub fn changed(&self) -> bool {
        self.recovered
            + self.dropped_stale
            + self.dropped_archived
            + self.dropped_duplicates
            + self.normalized
            > 0
            || self.rebuilt
    }
}

/// Bring `index` in line with the records on disk; the caller flushes
pub fn reconcile(records: &RecordStore, index: &mut OperativeIndex) -> Result<ReconcileReport> {
    let mut report = ReconcileReport::default();

    for pointer in index.entries_mut() {
        let base = reference_basename(&pointer.reference);
        if base.len() != pointer.reference.len() {
            pointer.reference = base.to_string();
            report.normalized += 1;
        }
    }

    let on_disk: Vec<RecordKey> = records.list_all()?;
    let mut readable: BTreeMap<RecordKey, Record> = BTreeMap::new();
    for (level, id) in &on_disk {
        match records.load(*level, id) {
            Ok(record) => {
                readable.insert((*level, id.clone()), record);
            }
            Err(e) => {
                warn!(level, %id, error = %e, "skipping unreadable record");
                report.skipped += 1;
            }
        }
    }

    let archived: HashSet<RecordKey> = readable
        .values()
        .flat_map(Record::lineage)
        .map(pointer_key)
        .collect();
    let on_disk: HashSet<RecordKey> = on_disk.into_iter().collect();

    let mut seen = HashSet::new();
    index.retain(|pointer| {
        let key = pointer_key(pointer);
        if !on_disk.contains(&key) {
            debug!(reference = %pointer.reference, "dropping stale index entry");
            report.dropped_stale += 1;
            false
        } else if archived.contains(&key) {
            debug!(reference = %pointer.reference, "dropping archived index entry");
            report.dropped_archived += 1;
            false
        } else if !seen.insert(key) {
            report.dropped_duplicates += 1;
            false
        } else {
            true
        }
    });

    let describer = ExtractiveSummarizer::new();
    for (key, record) in &readable {
        if seen.contains(key) || archived.contains(key) {
            continue;
        }
        debug!(level = key.0, id = %key.1, "recovering index entry");
        index.insert_ordered(synthesize(key, record, &describer));
        report.recovered += 1;
    }

    Ok(report)
}

/// Identity of the record a pointer refers to
fn pointer_key(pointer: &SummaryPointer) -> RecordKey {
    parse_record_filename(reference_basename(&pointer.reference))
        .unwrap_or_else(|| (pointer.level, pointer.id.clone()))
}

fn synthesize(
    (level, id): &RecordKey,
    record: &Record,
    describer: &ExtractiveSummarizer,
) -> SummaryPointer {
    match record {
        Record::Period(period) => {
            let start = period.summaries.first().and_then(|p| p.span().0);
            let end = period.summaries.last().and_then(|p| p.span().1);
            SummaryPointer::period(
                *level,
                id.as_str(),
                start.or(Some(period.timestamp)),
                end.or(Some(period.timestamp)),
                period.period_summary.as_str(),
            )
        }
        Record::Message(message) => SummaryPointer::message(
            *level,
            id.as_str(),
            message.timestamp,
            describer.describe_now(&message.content),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn setup() -> (tempfile::TempDir, RecordStore, OperativeIndex) {
        let dir = tempfile::tempdir().unwrap();
        let records = RecordStore::open(dir.path()).unwrap();
        let index = OperativeIndex::empty(records.paths().index_file());
        (dir, records, index)
    }

    fn persist_message(records: &RecordStore, text: &str) -> SummaryPointer {
        let record = Record::message(json!(text));
        let id = records.persist(&record).unwrap();
        SummaryPointer::message(0, id, record.timestamp(), text)
    }

    #[test]
    fn test_consistent_index_is_untouched() {
        let (_dir, records, mut index) = setup();
        index.append(persist_message(&records, "a"));
        index.append(persist_message(&records, "b"));
        let before = index.entries().to_vec();

        let report = reconcile(&records, &mut index).unwrap();
        assert!(!report.changed());
        assert_eq!(index.entries(), before.as_slice());
    }

    #[test]
    fn test_stale_entry_is_dropped() {
        let (_dir, records, mut index) = setup();
        index.append(persist_message(&records, "a"));
        index.append(SummaryPointer::message(0, "1", chrono::Utc::now(), "ghost"));

        let report = reconcile(&records, &mut index).unwrap();
        assert_eq!(report.dropped_stale, 1);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_missing_promoted_record_is_recovered() {
        let (_dir, records, mut index) = setup();
        let a = persist_message(&records, "a");
        let b = persist_message(&records, "b");
        let id = records
            .persist(&Record::period(1, vec![a.clone(), b.clone()], "ab".into()))
            .unwrap();
        index.append(a);
        index.append(b);

        let report = reconcile(&records, &mut index).unwrap();
        assert_eq!(report.dropped_archived, 2);
        assert_eq!(report.recovered, 1);
        assert_eq!(index.len(), 1);

        let pointer = &index.entries()[0];
        assert_eq!(pointer.id, id);
        assert_eq!(pointer.level, 1);
        assert_eq!(pointer.summary, "ab");
        assert_eq!(pointer.reference, format!("memory_1_{id}.json"));
    }

    #[test]
    fn test_orphaned_message_is_recovered_in_order() {
        let (_dir, records, mut index) = setup();
        let first = persist_message(&records, "First thing. More detail.");
        let second = persist_message(&records, "second");
        index.append(second.clone());

        let report = reconcile(&records, &mut index).unwrap();
        assert_eq!(report.recovered, 1);
        assert_eq!(index.entries()[0].id, first.id);
        assert_eq!(index.entries()[0].summary, "First thing");
        assert_eq!(index.entries()[1].id, second.id);
    }

    #[test]
    fn test_legacy_reference_is_normalized() {
        let (_dir, records, mut index) = setup();
        let mut pointer = persist_message(&records, "a");
        pointer.reference = format!("server/memory/{}", pointer.reference);
        index.append(pointer);

        let report = reconcile(&records, &mut index).unwrap();
        assert_eq!(report.normalized, 1);
        assert_eq!(report.dropped_stale, 0);
        assert!(!index.entries()[0].reference.contains('/'));
    }

    #[test]
    fn test_unreadable_record_is_skipped() {
        let (dir, records, mut index) = setup();
        index.append(persist_message(&records, "a"));
        std::fs::write(dir.path().join("memory_1_5.json"), "garbage").unwrap();

        let report = reconcile(&records, &mut index).unwrap();
        assert_eq!(report.skipped, 1);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_duplicate_entries_collapse() {
        let (_dir, records, mut index) = setup();
        let pointer = persist_message(&records, "a");
        index.append(pointer.clone());
        index.append(pointer);

        let report = reconcile(&records, &mut index).unwrap();
        assert_eq!(report.dropped_duplicates, 1);
        assert_eq!(index.len(), 1);
    }
}
