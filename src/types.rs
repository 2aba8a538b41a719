//! Common types used throughout strapi-fetch
//!
//! This module contains shared type definitions, type aliases,
//! and the policy enums that steer the fetcher.

use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Query parameters as sent on the wire, in order.
///
/// A key may repeat (`id_in[]=1&id_in[]=2`).
pub type QueryParams = Vec<(String, String)>;

/// First value sent for a query key
#[cfg(test)]
pub(crate) fn query_param<'a>(params: &'a QueryParams, key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

// ============================================================================
// Count Policy
// ============================================================================

/// How a configured total limit combines with the count reported by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountPolicy {
    /// Use the total limit only when it is below the reported count
    #[default]
    Clamp,
    /// Use the total limit whenever it is set, even above the reported count
    Unclamped,
}

impl CountPolicy {
    /// Compute the number of entities to fetch.
    ///
    /// A total limit of zero counts as unset. A reported count of zero
    /// always yields zero.
    pub fn effective_count(self, total_count: u64, total_limit: Option<u64>) -> u64 {
        if total_count == 0 {
            return 0;
        }
        match (self, total_limit.filter(|&limit| limit > 0)) {
            (Self::Clamp, Some(limit)) if limit < total_count => limit,
            (Self::Unclamped, Some(limit)) => limit,
            _ => total_count,
        }
    }
}

// ============================================================================
// Step Policy
// ============================================================================

/// Where the page-to-page offset increment comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepPolicy {
    /// `queryLimit` from the entity's query overrides, else the context page size
    #[default]
    QueryLimitOverride,
    /// The `_limit` value actually sent with each page request
    SentLimit,
}

// ============================================================================
// Log Level
// ============================================================================

/// Level of a reporter log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Info,
    Fatal,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Fatal => tracing::Level::ERROR,
        }
    }
}

// ============================================================================
// Utilities
// ============================================================================

/// Extension trait for Option<String> to handle empty strings
pub trait OptionStringExt {
    /// Returns None if the string is empty
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.is_empty())
    }
}

impl OptionStringExt for String {
    fn none_if_empty(self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}
