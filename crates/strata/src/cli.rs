use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "strata")]
#[command(version)]
#[command(about = "Hierarchical leveled memory for conversational assistants")]
pub struct Cli {
    /// Memory directory (defaults to STRATA_MEMORY_DIR or ~/.strata/memory)
    #[arg(long, global = true)]
    pub dir: Option<PathBuf>,

    /// Active entries per level before the oldest batch is promoted
    #[arg(long, global = true)]
    pub threshold: Option<usize>,

    /// Use the offline extractive summarizer even if an API key is set
    #[arg(long, global = true)]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the memory directory and index
    Init,

    /// Save content as a new level-0 memory and compact
    Save {
        /// Content to store (read from stdin if omitted)
        content: Option<String>,

        /// Parse the content as JSON instead of storing it as text
        #[arg(long)]
        json: bool,
    },

    /// Show the most recent active entries
    Recent {
        #[arg(short, long, default_value_t = 5)]
        limit: usize,

        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print one record by level and id
    Show { level: u32, id: String },

    /// Reconcile the index against record files
    Reconcile,

    /// Show per-level entry counts
    Status,

    /// Print version information
    Version,
}
