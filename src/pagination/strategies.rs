//! Pagination strategy implementations

use super::types::{NextPage, PagePlan, PaginationState, Paginator, LIMIT_PARAM, START_PARAM};
use crate::types::QueryParams;

// ============================================================================
// Offset Pagination
// ============================================================================

/// Count-bounded offset pagination
///
/// Sends `?_limit=N&_start=OFFSET` and advances the offset by a fixed step
/// until it reaches the target count. The response body does not influence
/// when pagination stops.
#[derive(Debug, Clone)]
pub struct OffsetPaginator {
    /// Query parameter name for offset
    pub offset_param: String,
    /// Query parameter name for limit
    pub limit_param: String,
    /// Page size sent with each request
    pub limit_value: u64,
    /// Offset increment between pages
    pub step: u64,
    /// Stop once the offset reaches this count
    pub target_count: u64,
}

impl OffsetPaginator {
    /// Create a new offset paginator
    pub fn new(limit_value: u64, step: u64, target_count: u64) -> Self {
        Self {
            offset_param: START_PARAM.to_string(),
            limit_param: LIMIT_PARAM.to_string(),
            limit_value,
            step,
            target_count,
        }
    }

    /// Create a paginator following a resolved plan
    pub fn from_plan(plan: &PagePlan) -> Self {
        Self::new(plan.page_size, plan.step, plan.target_count)
    }
}

impl Paginator for OffsetPaginator {
    fn has_next(&self, state: &PaginationState) -> bool {
        !state.done && state.offset < self.target_count
    }

    fn page_params(&self, state: &PaginationState) -> QueryParams {
        vec![
            (self.limit_param.clone(), self.limit_value.to_string()),
            (self.offset_param.clone(), state.offset.to_string()),
        ]
    }

    fn process_page(&self, records_count: usize, state: &mut PaginationState) -> NextPage {
        state.add_page(records_count as u64);
        state.add_offset(self.step);

        if !self.has_next(state) {
            state.mark_done();
            return NextPage::Done;
        }

        NextPage::with_params(self.page_params(state))
    }
}
