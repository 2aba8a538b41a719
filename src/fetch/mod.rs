//! Paginated entity fetching
//!
//! # Overview
//!
//! A run for one entity type:
//! 1. `GET {api_url}/{endpoint}/count` with the entity's query overrides
//! 2. resolve a [`PagePlan`] from the count and the context limits
//! 3. `GET {api_url}/{endpoint}?_limit=..&_start=..` page by page, strictly
//!    in order, until the offset reaches the target count
//! 4. normalize every collected record
//!
//! Any failed request is reported once through [`Reporter::fatal`] and aborts
//! the run with [`Error::FetchFailed`]. Nothing is retried and no partial
//! result is returned.

mod types;

pub use types::{FetchOutput, FetchStats};

use crate::auth::AuthConfig;
use crate::config::{json_to_u64, EntityDefinition, FetchContext};
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, RequestConfig};
use crate::normalize::Normalizer;
use crate::pagination::{NextPage, OffsetPaginator, PagePlan, PaginationState, Paginator};
use crate::reporter::Reporter;
use crate::types::{JsonObject, JsonValue, QueryParams};
use std::time::Instant;
use tracing::debug;

const COUNT_FAILED: &str = "Failed to count data from Strapi";
const FETCH_FAILED: &str = "Failed to fetch data from Strapi";
const INVALID_PAGINATION: &str = "Invalid pagination settings for Strapi";

/// Fetches and normalizes entities for one fetch context
#[derive(Debug)]
pub struct EntityFetcher {
    client: HttpClient,
    ctx: FetchContext,
    normalizer: Normalizer,
}

impl EntityFetcher {
    /// Create a fetcher with default HTTP settings
    pub fn new(ctx: FetchContext) -> Result<Self> {
        Self::with_http_config(ctx, HttpClientConfig::default())
    }

    /// Create a fetcher with custom HTTP settings.
    ///
    /// The context's token, when present, is sent as a bearer token on every
    /// request.
    pub fn with_http_config(ctx: FetchContext, config: HttpClientConfig) -> Result<Self> {
        let auth = AuthConfig::from_token(ctx.jwt_token.as_deref());
        let client = HttpClient::with_auth(config, auth)?;
        Ok(Self {
            client,
            ctx,
            normalizer: Normalizer::default(),
        })
    }

    /// Use a custom normalizer
    #[must_use]
    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// The fetch context
    pub fn context(&self) -> &FetchContext {
        &self.ctx
    }

    /// Ask the API how many entities exist
    pub async fn count(&self, entity: &EntityDefinition, reporter: &dyn Reporter) -> Result<u64> {
        let base = self.ctx.entity_url(&entity.endpoint);

        reporter.info(&format!(
            "Starting to count data from Strapi - {base} with params {}",
            describe_page_params(&[], entity.qs())
        ));

        self.request_count(&base, entity.query_overrides())
            .await
            .map_err(|e| abort(reporter, COUNT_FAILED, e))
    }

    async fn request_count(&self, base: &str, params: QueryParams) -> Result<u64> {
        let config = RequestConfig::new().queries(params);
        let body: JsonValue = self
            .client
            .get_json_with_config(&format!("{base}/count"), config)
            .await?;
        parse_count(&body)
    }

    /// Fetch all entities up to the target count, normalized
    pub async fn fetch(
        &self,
        entity: &EntityDefinition,
        reporter: &dyn Reporter,
    ) -> Result<Vec<JsonValue>> {
        Ok(self.fetch_with_stats(entity, reporter).await?.entities)
    }

    /// Fetch all entities and return run statistics alongside
    pub async fn fetch_with_stats(
        &self,
        entity: &EntityDefinition,
        reporter: &dyn Reporter,
    ) -> Result<FetchOutput> {
        let start = Instant::now();
        let base = self.ctx.entity_url(&entity.endpoint);

        let total_count = self.count(entity, reporter).await?;
        let plan = PagePlan::resolve(&self.ctx, entity, total_count).inspect_err(|e| {
            reporter.fatal(INVALID_PAGINATION, e);
        })?;

        reporter.info(&format!(
            "Fetching {} out of {} items from Strapi - {base}",
            plan.target_count, plan.total_count
        ));

        let paginator = OffsetPaginator::from_plan(&plan);
        let overrides = entity.query_overrides();
        let mut state = PaginationState::new();
        let mut records = Vec::new();
        let mut page_params = paginator.page_params(&state);

        while paginator.has_next(&state) {
            reporter.info(&format!(
                "Starting to fetch data from Strapi - {base} with params {}",
                describe_page_params(&page_params, entity.qs())
            ));

            let config = RequestConfig::new()
                .queries(page_params)
                .queries(overrides.clone());

            let page: JsonValue = self
                .client
                .get_json_with_config(&base, config)
                .await
                .map_err(|e| abort(reporter, FETCH_FAILED, e))?;

            let received = append_page(&mut records, page);
            debug!(
                "Page {} of {}: {received} records",
                state.pages_fetched + 1,
                entity.display_name()
            );

            match paginator.process_page(received, &mut state) {
                NextPage::Continue { query_params } => page_params = query_params,
                NextPage::Done => break,
            }
        }

        let mut stats = FetchStats::from_run(&plan, &state);
        stats.set_duration(start.elapsed().as_millis() as u64);

        Ok(FetchOutput {
            entities: self.normalizer.clean_all(records),
            stats,
        })
    }
}

/// Fetch and normalize every entity of one type.
///
/// Builds a fresh client for the call; use [`EntityFetcher`] to share one
/// across entity types.
pub async fn fetch_entities(
    entity: &EntityDefinition,
    ctx: &FetchContext,
    reporter: &dyn Reporter,
) -> Result<Vec<JsonValue>> {
    EntityFetcher::new(ctx.clone())?
        .fetch(entity, reporter)
        .await
}

fn abort(reporter: &dyn Reporter, message: &str, error: Error) -> Error {
    reporter.fatal(message, &error);
    Error::fetch_failed(message, error)
}

fn parse_count(body: &JsonValue) -> Result<u64> {
    json_to_u64(body).ok_or_else(|| Error::decode(format!("Count response is not a number: {body}")))
}

/// Append a page: arrays element-wise, anything else as one record
fn append_page(records: &mut Vec<JsonValue>, page: JsonValue) -> usize {
    match page {
        JsonValue::Array(items) => {
            let received = items.len();
            records.extend(items);
            received
        }
        other => {
            records.push(other);
            1
        }
    }
}

/// Render request params as a JSON object for progress messages.
///
/// Page params come first with numeric values unquoted, then the raw
/// query-string overrides, which replace a page param of the same name in
/// place.
fn describe_page_params(page_params: &[(String, String)], qs: Option<&JsonObject>) -> String {
    let mut entries: Vec<(&str, JsonValue)> = page_params
        .iter()
        .map(|(key, value)| {
            let value = value
                .parse::<u64>()
                .map_or_else(|_| JsonValue::from(value.as_str()), JsonValue::from);
            (key.as_str(), value)
        })
        .collect();

    for (key, value) in qs.into_iter().flatten() {
        match entries.iter().position(|(k, _)| *k == key.as_str()) {
            Some(index) => entries[index].1 = value.clone(),
            None => entries.push((key.as_str(), value.clone())),
        }
    }

    let fields: Vec<String> = entries
        .iter()
        .map(|(key, value)| format!("{}:{value}", JsonValue::from(*key)))
        .collect();
    format!("{{{}}}", fields.join(","))
}
