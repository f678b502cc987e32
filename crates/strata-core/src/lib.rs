//! Leveled memory: save, compact and recover

mod bootstrap;
mod compaction;
mod config;
mod error;
mod memory;

pub use bootstrap::{reconcile, ReconcileReport};
pub use compaction::{Compactor, Promotion};
pub use config::MemoryConfig;
pub use error::{MemoryError, Result};
pub use memory::HierarchicalMemory;
