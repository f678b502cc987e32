//! On-disk record and index entry types

use crate::paths::record_filename;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of record a pointer refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Raw level-0 record
    Message,
    /// Promoted record summarizing a batch of the level below
    PeriodSummary,
}

/// Operative index entry referencing exactly one record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryPointer {
    pub id: String,
    #[serde(default)]
    pub level: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub summary: String,
    pub reference: String,
}

impl SummaryPointer {
    /// Pointer to a raw record
    pub fn message(
        level: u32,
        id: impl Into<String>,
        timestamp: DateTime<Utc>,
        summary: impl Into<String>,
    ) -> Self {
        let id = id.into();
        Self {
            reference: record_filename(level, &id),
            id,
            level,
            timestamp: Some(timestamp),
            start_time: None,
            end_time: None,
            kind: EntryKind::Message,
            summary: summary.into(),
        }
    }

    /// Pointer to a promoted record covering `[start, end]`
    pub fn period(
        level: u32,
        id: impl Into<String>,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        summary: impl Into<String>,
    ) -> Self {
        let id = id.into();
        Self {
            reference: record_filename(level, &id),
            id,
            level,
            timestamp: None,
            start_time: start,
            end_time: end,
            kind: EntryKind::PeriodSummary,
            summary: summary.into(),
        }
    }

    /// Time range covered by the entry; a message covers a single instant
    pub fn span(&self) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        (
            self.start_time.or(self.timestamp),
            self.end_time.or(self.timestamp),
        )
    }
}

/// Level-0 record: `{ content, timestamp, level: 0 }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub content: Value,
    pub timestamp: DateTime<Utc>,
    pub level: u32,
}

/// Promoted record: `{ summaries, periodSummary, timestamp, level }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodRecord {
    pub summaries: Vec<SummaryPointer>,
    pub period_summary: String,
    pub timestamp: DateTime<Utc>,
    pub level: u32,
}

/// Any record file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Record {
    Period(PeriodRecord),
    Message(MessageRecord),
}

impl Record {
    pub fn message(content: Value) -> Self {
        Record::Message(MessageRecord {
            content,
            timestamp: Utc::now(),
            level: 0,
        })
    }

    pub fn period(level: u32, summaries: Vec<SummaryPointer>, period_summary: String) -> Self {
        Record::Period(PeriodRecord {
            summaries,
            period_summary,
            timestamp: Utc::now(),
            level,
        })
    }

    pub fn level(&self) -> u32 {
        match self {
            Record::Period(r) => r.level,
            Record::Message(r) => r.level,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Record::Period(r) => r.timestamp,
            Record::Message(r) => r.timestamp,
        }
    }

    /// Pointers this record archives (empty for raw records)
    pub fn lineage(&self) -> &[SummaryPointer] {
        match self {
            Record::Period(r) => &r.summaries,
            Record::Message(_) => &[],
        }
    }
}
