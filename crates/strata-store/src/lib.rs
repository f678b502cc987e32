//! Durable storage for leveled memory: immutable record files and the
//! operative index of active summary pointers

mod error;
mod index;
mod io;
mod paths;
mod records;
mod types;

pub use error::{Result, StoreError};
pub use index::OperativeIndex;
pub use io::{atomic_write, read_json};
pub use paths::{parse_record_filename, record_filename, reference_basename, MemoryPaths};
pub use records::RecordStore;
pub use types::{EntryKind, MessageRecord, PeriodRecord, Record, SummaryPointer};
