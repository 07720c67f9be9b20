//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

/// Mold and cutter event tracker.
///
/// Merges the location, shipment and status logs into one timeline and
/// keeps a durable unread badge for recent shipments and moves.
#[derive(Debug, Parser)]
#[command(name = "mt", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show database location, log counts and the badge.
    Status,

    /// List events, filtered, sorted and paged.
    Events {
        #[command(flatten)]
        filter: FilterArgs,

        #[command(flatten)]
        sort: SortArgs,

        /// Page number (1-based).
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show counts per action for the matching events.
    Summary {
        #[command(flatten)]
        filter: FilterArgs,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the notification badge.
    Badge {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Mark one event as read.
    Read {
        /// Event ID (e.g., location:12).
        event_id: String,
    },

    /// Dismiss every recent or read event.
    Dismiss,

    /// Clear all read and dismissed flags.
    Reset,

    /// Export the matching events.
    Export {
        #[command(flatten)]
        filter: FilterArgs,

        #[command(flatten)]
        sort: SortArgs,

        /// Output format.
        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
    },

    /// Refresh periodically and search by keywords typed on stdin.
    Watch,
}

/// Filters shared by listing, summary and export.
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Only this action (e.g., SHIP_OUT, location-change).
    #[arg(long)]
    pub action: Option<String>,

    /// Only events recorded by this handler name.
    #[arg(long)]
    pub handler: Option<String>,

    /// Keyword search; digits-only terms also match dates (e.g., 1218).
    #[arg(long)]
    pub search: Option<String>,

    /// Column for an exact match (date, code, name, action, from, to, notes, handler).
    #[arg(long, requires = "value")]
    pub field: Option<String>,

    /// Value for --field.
    #[arg(long, requires = "field")]
    pub value: Option<String>,

    /// Earliest event date (YYYY-MM-DD).
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Latest event date (YYYY-MM-DD).
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

/// Sort options shared by listing and export.
#[derive(Debug, Clone, Args)]
pub struct SortArgs {
    /// Sort column.
    #[arg(long, default_value = "date")]
    pub sort: String,

    /// Oldest or lowest first.
    #[arg(long)]
    pub asc: bool,
}

/// Export output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Text,
}
