//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Fetch and normalize entities from a Strapi API
#[derive(Parser, Debug)]
#[command(name = "strapi-fetch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Source configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the configured API URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Override the configured bearer token
    #[arg(long, global = true)]
    pub token: Option<String>,

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
    /// Fetch entities and print them keyed by entity name
    Fetch {
        /// Only fetch these entities (comma-separated, empty = all)
        #[arg(long)]
        entities: Option<String>,

        /// Write output to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Override the configured total limit
        #[arg(long)]
        total_limit: Option<u64>,
    },

    /// Print the count reported by the API for each entity
    Count {
        /// Only count these entities (comma-separated, empty = all)
        #[arg(long)]
        entities: Option<String>,
    },

    /// Validate the source configuration
    Validate,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON
    Json,
    /// Indented JSON
    Pretty,
}
