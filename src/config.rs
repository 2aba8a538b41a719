//! Configuration types for entity fetching
//!
//! `EntityDefinition` and `FetchContext` are the inputs of a single fetch run.
//! `SourceConfig` is the file-level configuration the CLI loads from YAML or
//! JSON and turns into those inputs.

use crate::error::{Error, Result};
use crate::types::{
    CountPolicy, JsonObject, JsonValue, OptionStringExt, QueryParams, StepPolicy,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Environment variable consulted when no token is configured
pub const TOKEN_ENV_VAR: &str = "STRAPI_TOKEN";

/// Query override key that changes the page-to-page offset step
pub const QUERY_LIMIT_OVERRIDE: &str = "queryLimit";

// ============================================================================
// Entity Definition
// ============================================================================

/// Per-request API options for an entity type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiOptions {
    /// Query-string overrides merged into every request for the entity
    #[serde(default)]
    pub qs: JsonObject,
}

/// One entity type to fetch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "EntityDefinitionDef")]
pub struct EntityDefinition {
    /// Output name (defaults to the endpoint)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Endpoint path below the API URL (e.g. "articles")
    pub endpoint: String,

    /// Optional request overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api: Option<ApiOptions>,
}

/// Accepts either a bare endpoint string or a full mapping
#[derive(Deserialize)]
#[serde(untagged)]
enum EntityDefinitionDef {
    Endpoint(String),
    Full {
        #[serde(default)]
        name: Option<String>,
        endpoint: String,
        #[serde(default)]
        api: Option<ApiOptions>,
    },
}

impl From<EntityDefinitionDef> for EntityDefinition {
    fn from(def: EntityDefinitionDef) -> Self {
        match def {
            EntityDefinitionDef::Endpoint(endpoint) => Self::new(endpoint),
            EntityDefinitionDef::Full {
                name,
                endpoint,
                api,
            } => Self {
                name,
                endpoint,
                api,
            },
        }
    }
}

impl EntityDefinition {
    /// Create a definition for an endpoint with no overrides
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            name: None,
            endpoint: endpoint.into(),
            api: None,
        }
    }

    /// Set the output name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add a query-string override
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.api
            .get_or_insert_with(ApiOptions::default)
            .qs
            .insert(key.into(), value.into());
        self
    }

    /// Output name for this entity
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.endpoint)
    }

    /// Raw query-string overrides, if any
    pub fn qs(&self) -> Option<&JsonObject> {
        self.api.as_ref().map(|api| &api.qs)
    }

    /// Query-string overrides rendered for the wire.
    ///
    /// Null values are dropped. Arrays become one `key[]` pair per element.
    /// Strings are sent verbatim, other scalars in their JSON form, and
    /// objects as JSON text.
    pub fn query_overrides(&self) -> QueryParams {
        let mut params = QueryParams::new();
        for (key, value) in self.qs().into_iter().flatten() {
            match value {
                JsonValue::Null => {}
                JsonValue::Array(items) => {
                    let key = format!("{key}[]");
                    params.extend(items.iter().map(|item| (key.clone(), query_value(item))));
                }
                other => params.push((key.clone(), query_value(other))),
            }
        }
        params
    }

    /// `queryLimit` override for the offset step, when present and non-zero
    pub fn query_limit_override(&self) -> Option<u64> {
        self.qs()
            .and_then(|qs| qs.get(QUERY_LIMIT_OVERRIDE))
            .and_then(json_to_u64)
            .filter(|&limit| limit > 0)
    }
}

fn query_value(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Read a non-negative integer from a JSON number or numeric string
pub(crate) fn json_to_u64(value: &JsonValue) -> Option<u64> {
    match value {
        JsonValue::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// ============================================================================
// Fetch Context
// ============================================================================

/// Caller-supplied settings for a fetch run
#[derive(Debug, Clone, PartialEq)]
pub struct FetchContext {
    /// Base URL of the API (e.g. "http://localhost:1337")
    pub api_url: String,
    /// Page size sent as `_limit`
    pub query_limit: u64,
    /// Optional cap on the number of entities
    pub total_limit: Option<u64>,
    /// Bearer token for the Authorization header
    pub jwt_token: Option<String>,
    /// How `total_limit` combines with the reported count
    pub count_policy: CountPolicy,
    /// Where the offset step comes from
    pub step_policy: StepPolicy,
}

impl FetchContext {
    /// Create a context with the given base URL and page size
    pub fn new(api_url: impl Into<String>, query_limit: u64) -> Self {
        Self {
            api_url: api_url.into(),
            query_limit,
            total_limit: None,
            jwt_token: None,
            count_policy: CountPolicy::default(),
            step_policy: StepPolicy::default(),
        }
    }

    /// Set the total limit
    #[must_use]
    pub fn with_total_limit(mut self, limit: u64) -> Self {
        self.total_limit = Some(limit);
        self
    }

    /// Set the bearer token (empty tokens are ignored)
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.jwt_token = token.into().none_if_empty();
        self
    }

    /// Set the count policy
    #[must_use]
    pub fn with_count_policy(mut self, policy: CountPolicy) -> Self {
        self.count_policy = policy;
        self
    }

    /// Set the step policy
    #[must_use]
    pub fn with_step_policy(mut self, policy: StepPolicy) -> Self {
        self.step_policy = policy;
        self
    }

    /// Base URL for an entity endpoint
    pub fn entity_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.api_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }
}

// ============================================================================
// Source Config (file)
// ============================================================================

/// File-level source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Base URL of the API
    pub api_url: String,

    /// Page size
    #[serde(default = "default_query_limit")]
    pub query_limit: u64,

    /// Optional cap on entities per type
    #[serde(default)]
    pub total_limit: Option<u64>,

    /// Static bearer token
    #[serde(default)]
    pub jwt_token: Option<String>,

    /// How `total_limit` combines with the reported count
    #[serde(default)]
    pub count_policy: CountPolicy,

    /// Where the offset step comes from
    #[serde(default)]
    pub step_policy: StepPolicy,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpSettings,

    /// Entity types to fetch
    #[serde(default)]
    pub entities: Vec<EntityDefinition>,
}

fn default_query_limit() -> u64 {
    100
}

/// HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            user_agent: None,
        }
    }
}

fn default_timeout() -> u64 {
    30
}

impl HttpSettings {
    /// Request timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl SourceConfig {
    /// Parse a YAML document
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Parse a JSON document
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Fill in the token from an environment value when none is configured
    #[must_use]
    pub fn with_token_fallback(mut self, env_token: Option<String>) -> Self {
        self.jwt_token = self
            .jwt_token
            .none_if_empty()
            .or_else(|| env_token.none_if_empty());
        self
    }

    /// Check the config before any request is made
    pub fn validate(&self) -> Result<()> {
        if self.api_url.trim().is_empty() {
            return Err(Error::missing_field("api_url"));
        }
        let url = url::Url::parse(&self.api_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_value(
                "api_url",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }
        if self.query_limit == 0 {
            return Err(Error::invalid_value(
                "query_limit",
                "must be greater than zero",
            ));
        }
        if self.entities.is_empty() {
            return Err(Error::missing_field("entities"));
        }
        for entity in &self.entities {
            if entity.endpoint.trim().is_empty() {
                return Err(Error::invalid_value(
                    "entities",
                    format!("entity '{}' has an empty endpoint", entity.display_name()),
                ));
            }
        }
        Ok(())
    }

    /// Build the fetch context shared by every entity
    pub fn fetch_context(&self) -> FetchContext {
        FetchContext {
            api_url: self.api_url.clone(),
            query_limit: self.query_limit,
            total_limit: self.total_limit,
            jwt_token: self.jwt_token.clone().none_if_empty(),
            count_policy: self.count_policy,
            step_policy: self.step_policy,
        }
    }

    /// Look up an entity by output name or endpoint
    pub fn entity(&self, name: &str) -> Result<&EntityDefinition> {
        self.entities
            .iter()
            .find(|e| e.display_name() == name || e.endpoint == name)
            .ok_or_else(|| Error::EntityNotFound {
                name: name.to_string(),
            })
    }
}

/// Load a source config from a YAML or JSON file.
///
/// The format follows the file extension; anything other than `.json` is
/// read as YAML. A missing token falls back to `STRAPI_TOKEN`.
pub fn load_source_config(path: impl AsRef<Path>) -> Result<SourceConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            Error::config(format!(
                "Failed to read source config '{}': {}",
                path.display(),
                e
            ))
        }
    })?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let config = if is_json {
        SourceConfig::from_json_str(&content)?
    } else {
        SourceConfig::from_yaml_str(&content)?
    };

    Ok(config.with_token_fallback(std::env::var(TOKEN_ENV_VAR).ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::query_param;
    use serde_json::json;

    #[test]
    fn test_parse_minimal_source() {
        let yaml = r#"
api_url: "http://localhost:1337"
entities:
  - articles
"#;

        let config = SourceConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.api_url, "http://localhost:1337");
        assert_eq!(config.query_limit, 100);
        assert!(config.total_limit.is_none());
        assert_eq!(config.count_policy, CountPolicy::Clamp);
        assert_eq!(config.step_policy, StepPolicy::QueryLimitOverride);
        assert_eq!(config.entities, vec![EntityDefinition::new("articles")]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_entity() {
        let yaml = r#"
api_url: "https://cms.example.com"
query_limit: 25
total_limit: 60
jwt_token: "secret"
count_policy: unclamped
step_policy: sent_limit
http:
  timeout_seconds: 5
entities:
  - name: posts
    endpoint: articles
    api:
      qs:
        _sort: "published_at:DESC"
        queryLimit: 10
        _publicationState: null
"#;

        let config = SourceConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.query_limit, 25);
        assert_eq!(config.total_limit, Some(60));
        assert_eq!(config.http.timeout(), Duration::from_secs(5));

        let entity = config.entity("posts").unwrap();
        assert_eq!(entity.endpoint, "articles");
        assert_eq!(entity.query_limit_override(), Some(10));

        let overrides = entity.query_overrides();
        assert_eq!(query_param(&overrides, "_sort"), Some("published_at:DESC"));
        assert_eq!(query_param(&overrides, "queryLimit"), Some("10"));
        assert_eq!(query_param(&overrides, "_publicationState"), None);

        let ctx = config.fetch_context();
        assert_eq!(ctx.jwt_token.as_deref(), Some("secret"));
        assert_eq!(ctx.count_policy, CountPolicy::Unclamped);
        assert_eq!(ctx.step_policy, StepPolicy::SentLimit);
    }

    #[test]
    fn test_parse_json_source() {
        let json = r#"{"api_url": "http://localhost:1337", "entities": [{"endpoint": "users"}]}"#;
        let config = SourceConfig::from_json_str(json).unwrap();
        assert_eq!(config.entities[0].display_name(), "users");
        assert!(config.entity("missing").is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config =
            SourceConfig::from_yaml_str("api_url: \"ftp://x\"\nentities: [a]").unwrap();
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfigValue { .. })
        ));

        config.api_url = "not a url".to_string();
        assert!(matches!(config.validate(), Err(Error::InvalidUrl(_))));

        config.api_url = "http://localhost:1337".to_string();
        config.query_limit = 0;
        assert!(config.validate().is_err());

        config.query_limit = 10;
        config.entities.clear();
        assert!(matches!(
            config.validate(),
            Err(Error::MissingConfigField { .. })
        ));
    }

    #[test]
    fn test_token_fallback() {
        let config = SourceConfig::from_yaml_str("api_url: \"http://x\"").unwrap();
        let config = config.with_token_fallback(Some("from-env".to_string()));
        assert_eq!(config.jwt_token.as_deref(), Some("from-env"));

        let config = SourceConfig::from_yaml_str("api_url: \"http://x\"\njwt_token: \"file\"")
            .unwrap()
            .with_token_fallback(Some("from-env".to_string()));
        assert_eq!(config.jwt_token.as_deref(), Some("file"));

        let config = SourceConfig::from_yaml_str("api_url: \"http://x\"\njwt_token: \"\"")
            .unwrap()
            .with_token_fallback(None);
        assert!(config.jwt_token.is_none());
    }

    #[test]
    fn test_query_overrides_render_values() {
        let entity = EntityDefinition::new("articles")
            .with_query("_limit", 5)
            .with_query("_where", json!({"title_contains": "rust"}))
            .with_query("draft", false);

        let overrides = entity.query_overrides();
        assert_eq!(query_param(&overrides, "_limit"), Some("5"));
        assert_eq!(
            query_param(&overrides, "_where"),
            Some(r#"{"title_contains":"rust"}"#)
        );
        assert_eq!(query_param(&overrides, "draft"), Some("false"));
        assert_eq!(entity.query_limit_override(), None);
    }

    #[test]
    fn test_query_overrides_expand_arrays() {
        let entity = EntityDefinition::new("articles")
            .with_query("_sort", "title:ASC")
            .with_query("id_in", json!([1, "two", {"x": 3}]))
            .with_query("tags", json!([]));

        assert_eq!(
            entity.query_overrides(),
            vec![
                ("_sort".to_string(), "title:ASC".to_string()),
                ("id_in[]".to_string(), "1".to_string()),
                ("id_in[]".to_string(), "two".to_string()),
                ("id_in[]".to_string(), r#"{"x":3}"#.to_string()),
            ]
        );
    }

    #[test]
    fn test_query_limit_override_parsing() {
        let entity = EntityDefinition::new("a").with_query("queryLimit", "20");
        assert_eq!(entity.query_limit_override(), Some(20));

        let entity = EntityDefinition::new("a").with_query("queryLimit", 0);
        assert_eq!(entity.query_limit_override(), None);
    }

    #[test]
    fn test_entity_url_joins_slashes() {
        let ctx = FetchContext::new("http://localhost:1337/", 10);
        assert_eq!(ctx.entity_url("/articles"), "http://localhost:1337/articles");
        assert_eq!(ctx.entity_url("articles"), "http://localhost:1337/articles");
    }

    #[test]
    fn test_fetch_context_builder() {
        let ctx = FetchContext::new("http://x", 50)
            .with_total_limit(7)
            .with_token("")
            .with_count_policy(CountPolicy::Unclamped);
        assert_eq!(ctx.query_limit, 50);
        assert_eq!(ctx.total_limit, Some(7));
        assert!(ctx.jwt_token.is_none());
        assert_eq!(ctx.count_policy, CountPolicy::Unclamped);
    }

    #[test]
    fn test_load_source_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("source.json");
        fs::write(
            &path,
            r#"{"api_url": "http://localhost:1337", "jwt_token": "t", "entities": ["articles"]}"#,
        )
        .unwrap();

        let config = load_source_config(&path).unwrap();
        assert_eq!(config.entities.len(), 1);
        assert_eq!(config.jwt_token.as_deref(), Some("t"));

        let missing = load_source_config(dir.path().join("nope.yaml"));
        assert!(matches!(missing, Err(Error::FileNotFound { .. })));
    }
}
