//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Solidafy RestList CLI
#[derive(Parser, Debug)]
#[command(name = "solidafy-restlist")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Resource definition file (YAML)
    #[arg(short, long, global = true)]
    pub resource: Option<PathBuf>,

    /// Override the page size
    #[arg(long, global = true)]
    pub per_page: Option<u32>,

    /// Override sort expressions (comma-separated, `-field` for descending)
    #[arg(long, global = true, value_delimiter = ',')]
    pub sort: Option<Vec<String>>,

    /// Add a filter (`key=value`, repeatable)
    #[arg(long = "filter", global = true, value_parser = parse_filter)]
    pub filters: Vec<(String, String)>,

    /// Override the requested field subset (comma-separated)
    #[arg(long, global = true, value_delimiter = ',')]
    pub fields: Option<Vec<String>>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load the collection page by page and print its records
    List {
        /// Stop after this many pages (default: all)
        #[arg(long)]
        pages: Option<u32>,
    },

    /// Fetch the full representation of one item
    Detail {
        /// Item id
        #[arg(long)]
        id: String,
    },

    /// Load the first page and print the discovered role table
    Schema,

    /// Validate resource definition
    Validate,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}

/// Parse a `key=value` filter argument
pub fn parse_filter(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected key=value, got '{raw}'")),
    }
}
