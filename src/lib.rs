//! # strapi-fetch
//!
//! Paginated entity fetching for a Strapi-backed static-site source.
//!
//! ## Features
//!
//! - **Count-bounded pagination**: asks `/{endpoint}/count`, then walks
//!   `_limit` / `_start` pages strictly in order
//! - **Query overrides**: per-entity query-string values win over the
//!   pagination parameters
//! - **Bearer auth**: a static JWT is attached to every request
//! - **Record normalization**: `__v` dropped, `_id` moved to `id`, other
//!   `__`-prefixed keys renamed to `strapi_`
//! - **Injected reporting**: progress and the aborting failure go through a
//!   [`Reporter`](reporter::Reporter)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use strapi_fetch::{fetch_entities, EntityDefinition, FetchContext, TracingReporter};
//!
//! #[tokio::main]
//! async fn main() -> strapi_fetch::Result<()> {
//!     let ctx = FetchContext::new("http://localhost:1337", 100).with_token("jwt");
//!     let articles = EntityDefinition::new("articles").with_query("_sort", "title:ASC");
//!
//!     let entities = fetch_entities(&articles, &ctx, &TracingReporter).await?;
//!     println!("{} articles", entities.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  fetch_entities(entity, ctx, reporter) → Vec<JsonValue>  │
//! └──────────────────────────────────────────────────────────┘
//!                              │
//! ┌───────────┬────────────────┼───────────────┬─────────────┐
//! │   Auth    │     HTTP       │  Pagination   │  Normalize  │
//! ├───────────┼────────────────┼───────────────┼─────────────┤
//! │ Bearer    │ GET, no retry  │ count + offset│ __v, _id,   │
//! │           │ 2xx or error   │ _limit/_start │ __ prefix   │
//! └───────────┴────────────────┴───────────────┴─────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Entity definitions, fetch context and source config files
pub mod config;

/// Bearer authentication
pub mod auth;

/// HTTP client
pub mod http;

/// Count-bounded offset pagination
pub mod pagination;

/// Record key normalization
pub mod normalize;

/// Progress and failure reporting
pub mod reporter;

/// Paginated entity fetching
pub mod fetch;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use config::{load_source_config, ApiOptions, EntityDefinition, FetchContext, SourceConfig};
pub use fetch::{fetch_entities, EntityFetcher, FetchOutput, FetchStats};
pub use normalize::{clean, cleaned, Normalizer};
pub use reporter::{BufferedReporter, Reporter, TracingReporter};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
