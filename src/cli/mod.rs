//! CLI module
//!
//! Command-line interface for fetching entities.
//!
//! # Commands
//!
//! - `fetch` - Fetch and normalize entities
//! - `count` - Show the count reported for each entity
//! - `validate` - Check the source configuration

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
