//! Mold tracker CLI library.
//!
//! This crate provides the CLI interface over the event engine.

mod cli;
pub mod commands;
mod config;
pub mod source;

pub use cli::{Cli, Commands, ExportFormat, FilterArgs, SortArgs};
pub use config::Config;
pub use source::JsonSnapshotSource;
