//! CLI module
//!
//! Command-line interface for browsing a paginated REST collection.
//!
//! # Commands
//!
//! - `list` - Load pages and print records
//! - `detail` - Fetch one item's full representation
//! - `schema` - Print the discovered role table
//! - `validate` - Validate a resource definition

mod commands;
mod runner;

pub use commands::{parse_filter, Cli, Commands, OutputFormat};
pub use runner::Runner;
