//! Pagination module
//!
//! Supports: count-bounded offset pagination (`_limit` / `_start`)
//!
//! # Overview
//!
//! A fetch first asks the API for the total count, resolves a [`PagePlan`]
//! from it, then walks offsets with an [`OffsetPaginator`] until the target
//! count is reached.

mod strategies;
mod types;

pub use strategies::OffsetPaginator;
pub use types::{NextPage, PagePlan, PaginationState, Paginator, LIMIT_PARAM, START_PARAM};
