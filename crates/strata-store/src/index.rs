//! The operative index: ordered list of active summary pointers

use crate::io::{atomic_write, read_json};
use crate::records::id_order;
use crate::{Result, StoreError, SummaryPointer};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

#[derive(Deserialize)]
struct IndexFile {
    #[serde(default)]
    summaries: Vec<SummaryPointer>,
}

#[derive(Serialize)]
struct IndexFileRef<'a> {
    summaries: &'a [SummaryPointer],
}

/// Active pointers across all levels, in insertion order
#[derive(Debug, Clone)]
pub struct OperativeIndex {
    path: PathBuf,
    summaries: Vec<SummaryPointer>,
}

impl OperativeIndex {
    /// An empty index that will be written to `path`
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            summaries: Vec::new(),
        }
    }

    /// Load the index; an absent file yields an empty index
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        match read_json::<IndexFile>(&path) {
            Ok(file) => Ok(Self {
                path,
                summaries: file.summaries,
            }),
            Err(StoreError::NotFound(_)) => Ok(Self::empty(path)),
            Err(e) => Err(e),
        }
    }

    /// Replace the durable index with the in-memory list
    pub fn flush(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&IndexFileRef {
            summaries: &self.summaries,
        })?;
        atomic_write(&self.path, json.as_bytes())
    }

    pub fn entries(&self) -> &[SummaryPointer] {
        &self.summaries
    }

    pub fn entries_mut(&mut self) -> &mut [SummaryPointer] {
        &mut self.summaries
    }

    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    pub fn append(&mut self, pointer: SummaryPointer) {
        self.summaries.push(pointer);
    }

    /// Insert a pointer before the first entry with a later id
    pub fn insert_ordered(&mut self, pointer: SummaryPointer) {
        let pos = self
            .summaries
            .iter()
            .position(|p| id_order(&p.id, &pointer.id).is_gt())
            .unwrap_or(self.summaries.len());
        self.summaries.insert(pos, pointer);
    }

    /// Remove the pointers at `level` whose id is listed; returns how many went
    pub fn remove_many<'a>(&mut self, level: u32, ids: impl IntoIterator<Item = &'a str>) -> usize {
        let ids: HashSet<&str> = ids.into_iter().collect();
        let before = self.summaries.len();
        self.summaries
            .retain(|p| !(p.level == level && ids.contains(p.id.as_str())));
        before - self.summaries.len()
    }

    pub fn retain(&mut self, keep: impl FnMut(&SummaryPointer) -> bool) {
        self.summaries.retain(keep);
    }

    pub fn contains(&self, level: u32, id: &str) -> bool {
        self.summaries
            .iter()
            .any(|p| p.level == level && p.id == id)
    }

    pub fn active_count_at_level(&self, level: u32) -> usize {
        self.summaries.iter().filter(|p| p.level == level).count()
    }

    /// The `count` earliest-inserted pointers at `level`, oldest first
    pub fn oldest_at_level(&self, level: u32, count: usize) -> Vec<SummaryPointer> {
        self.summaries
            .iter()
            .filter(|p| p.level == level)
            .take(count)
            .cloned()
            .collect()
    }

    /// The last `limit` pointers, in index order
    pub fn recent(&self, limit: usize) -> &[SummaryPointer] {
        let start = self.summaries.len().saturating_sub(limit);
        &self.summaries[start..]
    }

    /// Active pointer count per level
    pub fn level_counts(&self) -> BTreeMap<u32, usize> {
        let mut counts = BTreeMap::new();
        for p in &self.summaries {
            *counts.entry(p.level).or_default() += 1;
        }
        counts
    }
}
