//! Pagination types and traits
//!
//! Defines the core pagination abstractions and the plan that bounds an
//! offset-paginated fetch.

use crate::config::{json_to_u64, EntityDefinition, FetchContext};
use crate::error::{Error, Result};
use crate::types::{QueryParams, StepPolicy};

/// Query parameter carrying the page size
pub const LIMIT_PARAM: &str = "_limit";

/// Query parameter carrying the offset
pub const START_PARAM: &str = "_start";

/// Result of the next page computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// More pages available with these parameters
    Continue {
        /// Query parameters to add/replace
        query_params: QueryParams,
    },
    /// No more pages
    Done,
}

impl NextPage {
    /// Create a continuation with query parameters
    pub fn with_params(params: QueryParams) -> Self {
        Self::Continue {
            query_params: params,
        }
    }

    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Check if this is a continue result
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue { .. })
    }
}

/// Tracks pagination state during iteration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationState {
    /// Offset of the next page
    pub offset: u64,
    /// Pages fetched so far
    pub pages_fetched: u64,
    /// Total records fetched so far
    pub total_fetched: u64,
    /// Is pagination complete?
    pub done: bool,
}

impl PaginationState {
    /// Create a new pagination state
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark pagination as complete
    pub fn mark_done(&mut self) {
        self.done = true;
    }

    /// Advance the offset
    pub fn add_offset(&mut self, amount: u64) {
        self.offset = self.offset.saturating_add(amount);
    }

    /// Record a fetched page
    pub fn add_page(&mut self, records: u64) {
        self.pages_fetched += 1;
        self.total_fetched += records;
    }
}

/// Core trait for pagination strategies
pub trait Paginator: Send + Sync {
    /// Whether a page should be requested for the current state
    fn has_next(&self, state: &PaginationState) -> bool;

    /// Query parameters for the page at the current state
    fn page_params(&self, state: &PaginationState) -> QueryParams;

    /// Record a fetched page and decide whether another one follows
    fn process_page(&self, records_count: usize, state: &mut PaginationState) -> NextPage;
}

/// Bounds of an offset-paginated fetch, resolved before the first page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePlan {
    /// Count reported by the API
    pub total_count: u64,
    /// Number of entities to fetch
    pub target_count: u64,
    /// `_limit` sent with each page when not overridden
    pub page_size: u64,
    /// Offset increment between pages
    pub step: u64,
}

impl PagePlan {
    /// Resolve the plan for an entity from the reported total count.
    ///
    /// A zero step cannot advance, so it is rejected whenever at least one
    /// page would be requested.
    pub fn resolve(
        ctx: &FetchContext,
        entity: &EntityDefinition,
        total_count: u64,
    ) -> Result<Self> {
        let target_count = ctx.count_policy.effective_count(total_count, ctx.total_limit);

        let step = match ctx.step_policy {
            StepPolicy::QueryLimitOverride => entity
                .query_limit_override()
                .unwrap_or(ctx.query_limit),
            StepPolicy::SentLimit => entity
                .qs()
                .and_then(|qs| qs.get(LIMIT_PARAM))
                .and_then(json_to_u64)
                .unwrap_or(ctx.query_limit),
        };

        if step == 0 && target_count > 0 {
            return Err(Error::invalid_value(
                "query_limit",
                format!(
                    "page step for '{}' is zero, pagination would never advance",
                    entity.display_name()
                ),
            ));
        }

        Ok(Self {
            total_count,
            target_count,
            page_size: ctx.query_limit,
            step,
        })
    }

    /// Number of page requests the plan will issue
    pub fn page_count(&self) -> u64 {
        if self.target_count == 0 {
            0
        } else {
            self.target_count.div_ceil(self.step)
        }
    }
}
