//! CLI interface for scour.
//!
//! Provides command-line argument parsing using clap.

use clap::{Parser, Subcommand};

use crate::search::MAX_FILES;

/// Default number of search results to return.
pub const DEFAULT_SEARCH_LIMIT: usize = MAX_FILES;

/// Command-line interface for scour.
#[derive(Parser)]
#[command(name = "scour")]
#[command(author, version, about = "Ranked search across an agent workspace", long_about = None)]
pub struct Cli {
    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Search the workspace, ranked by relevance.
    Search {
        /// The search query string.
        query: String,

        /// Maximum number of results to return.
        #[arg(short, long, default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: usize,

        /// Filter results to this group only (e.g. "memory", "knowledge").
        #[arg(short, long)]
        group: Option<String>,

        /// Emit results as JSON instead of formatted text.
        #[arg(long)]
        json: bool,
    },

    /// List the viewable workspace files.
    List {
        /// Filter to this group only.
        #[arg(short, long)]
        group: Option<String>,

        /// Emit the file list as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print one workspace file by its relative path.
    Get {
        /// Workspace-relative path (e.g. "memory/2026-08-01.md").
        path: String,
    },
}
