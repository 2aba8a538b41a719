//! Fetch result types

use crate::pagination::{PagePlan, PaginationState};
use crate::types::JsonValue;

/// Statistics from a fetch run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchStats {
    /// Count reported by the API
    pub total_count: u64,
    /// Number of entities the run aimed for
    pub target_count: u64,
    /// Page requests sent
    pub pages_fetched: u64,
    /// Records received across all pages
    pub records_fetched: u64,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl FetchStats {
    /// Stats for a finished pagination run
    pub fn from_run(plan: &PagePlan, state: &PaginationState) -> Self {
        Self {
            total_count: plan.total_count,
            target_count: plan.target_count,
            pages_fetched: state.pages_fetched,
            records_fetched: state.total_fetched,
            duration_ms: 0,
        }
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}

/// Normalized entities plus run statistics
#[derive(Debug, Clone, Default)]
pub struct FetchOutput {
    /// Normalized entities in request order
    pub entities: Vec<JsonValue>,
    /// Run statistics
    pub stats: FetchStats,
}

impl FetchOutput {
    /// Number of entities fetched
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check if nothing was fetched
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
