//! Write-once record files, one per record

use crate::io::{atomic_write, read_json};
use crate::paths::{parse_record_filename, reference_basename, MemoryPaths};
use crate::{Record, Result, StoreError};
use chrono::Utc;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

const MAX_ID_ATTEMPTS: usize = 16;

/// Strictly increasing microsecond-clock ids
#[derive(Debug, Default)]
struct IdGenerator {
    last: AtomicU64,
}

impl IdGenerator {
    fn next(&self) -> String {
        let now = Utc::now().timestamp_micros().max(0) as u64;
        let prev = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        now.max(prev + 1).to_string()
    }
}

/// Append-only store of record files under one directory
#[derive(Debug)]
pub struct RecordStore {
    paths: MemoryPaths,
    ids: IdGenerator,
}

impl RecordStore {
    /// Open a store, creating its directory if needed
    pub fn open(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        std::fs::create_dir_all(base_dir).map_err(|e| StoreError::io(base_dir, e))?;
        Ok(Self {
            paths: MemoryPaths::new(base_dir),
            ids: IdGenerator::default(),
        })
    }

    pub fn paths(&self) -> &MemoryPaths {
        &self.paths
    }

    /// Persist a record under a freshly allocated id
    pub fn persist(&self, record: &Record) -> Result<String> {
        let level = record.level();
        let data = serde_json::to_vec(record)?;

        let mut path = PathBuf::new();
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.ids.next();
            path = self.paths.record_file(level, &id);
            if path.exists() {
                continue;
            }
            atomic_write(&path, &data)?;
            tracing::debug!(level, %id, "persisted record");
            return Ok(id);
        }

        Err(StoreError::AlreadyExists(path))
    }

    /// Load a record by level and id
    pub fn load(&self, level: u32, id: &str) -> Result<Record> {
        let path = self.paths.record_file(level, id);
        let record: Record = read_json(&path)?;
        if record.level() != level {
            return Err(StoreError::malformed(
                &path,
                format!("stored level {} does not match filename", record.level()),
            ));
        }
        Ok(record)
    }

    /// Load the record a pointer's `reference` names
    pub fn load_reference(&self, reference: &str) -> Result<Record> {
        let name = reference_basename(reference);
        let (level, id) = parse_record_filename(name)
            .ok_or_else(|| StoreError::InvalidReference(reference.to_string()))?;
        self.load(level, &id)
    }

    /// Ids of every record stored at `level`
    pub fn list_existing(&self, level: u32) -> Result<BTreeSet<String>> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, id)| id)
            .collect())
    }

    /// Every record file as `(level, id)`, ordered by level then id
    pub fn list_all(&self) -> Result<Vec<(u32, String)>> {
        let dir = self.paths.base_dir();
        let entries = std::fs::read_dir(dir).map_err(|e| StoreError::io(dir, e))?;

        let mut found = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(dir, e))?;
            let name = entry.file_name();
            if let Some(parsed) = name.to_str().and_then(parse_record_filename) {
                found.push(parsed);
            }
        }
        found.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| id_order(&a.1, &b.1)));
        Ok(found)
    }
}

/// Numeric-aware id ordering: shorter decimal ids are older
pub(crate) fn id_order(a: &str, b: &str) -> std::cmp::Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
