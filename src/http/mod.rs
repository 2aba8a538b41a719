//! HTTP client module
//!
//! Provides a single-shot HTTP client used for the count and page requests.
//!
//! # Features
//!
//! - **Ordered query parameters**: repeated keys and per-key overrides
//! - **Authentication**: bearer token via the auth module
//! - **Error mapping**: non-2xx responses become `Error::HttpStatus`

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
