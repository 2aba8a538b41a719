//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::{load_source_config, EntityDefinition, SourceConfig};
use crate::error::{Error, Result};
use crate::fetch::EntityFetcher;
use crate::http::HttpClientConfig;
use crate::reporter::TracingReporter;
use crate::types::{JsonObject, JsonValue, OptionStringExt};
use std::fs;
use std::path::Path;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Fetch {
                entities,
                output,
                total_limit,
            } => {
                self.fetch(entities.as_deref(), output.as_deref(), *total_limit)
                    .await
            }
            Commands::Count { entities } => self.count(entities.as_deref()).await,
            Commands::Validate => self.validate(),
        }
    }

    /// Load the source config and apply command-line overrides
    fn load_config(&self) -> Result<SourceConfig> {
        let path = self
            .cli
            .config
            .as_ref()
            .ok_or_else(|| Error::config("Source config not specified (use -C flag)"))?;
        let mut config = load_source_config(path)?;

        if let Some(api_url) = &self.cli.api_url {
            config.api_url.clone_from(api_url);
        }
        if let Some(token) = self.cli.token.clone().none_if_empty() {
            config.jwt_token = Some(token);
        }

        config.validate()?;
        Ok(config)
    }

    /// Build a fetcher for the config
    fn fetcher(config: &SourceConfig) -> Result<EntityFetcher> {
        let mut http = HttpClientConfig::builder().timeout(config.http.timeout());
        if let Some(agent) = &config.http.user_agent {
            http = http.user_agent(agent);
        }
        EntityFetcher::with_http_config(config.fetch_context(), http.build())
    }

    async fn fetch(
        &self,
        filter: Option<&str>,
        output: Option<&Path>,
        total_limit: Option<u64>,
    ) -> Result<()> {
        let mut config = self.load_config()?;
        if total_limit.is_some() {
            config.total_limit = total_limit;
        }

        let fetcher = Self::fetcher(&config)?;
        let reporter = TracingReporter;
        let mut result = JsonObject::new();

        for entity in select_entities(&config, filter)? {
            let fetched = fetcher.fetch_with_stats(entity, &reporter).await?;
            info!(
                "Fetched {} {} in {} pages ({}ms)",
                fetched.len(),
                entity.display_name(),
                fetched.stats.pages_fetched,
                fetched.stats.duration_ms
            );
            result.insert(
                entity.display_name().to_string(),
                JsonValue::Array(fetched.entities),
            );
        }

        let rendered = render(&JsonValue::Object(result), self.cli.format)?;
        write_output(&rendered, output)
    }

    async fn count(&self, filter: Option<&str>) -> Result<()> {
        let config = self.load_config()?;
        let fetcher = Self::fetcher(&config)?;
        let reporter = TracingReporter;
        let mut counts = JsonObject::new();

        for entity in select_entities(&config, filter)? {
            let count = fetcher.count(entity, &reporter).await?;
            counts.insert(entity.display_name().to_string(), count.into());
        }

        let rendered = render(&JsonValue::Object(counts), self.cli.format)?;
        write_output(&rendered, None)
    }

    fn validate(&self) -> Result<()> {
        let config = self.load_config()?;
        let names: Vec<&str> = config
            .entities
            .iter()
            .map(EntityDefinition::display_name)
            .collect();
        println!(
            "Source config is valid: {} entities ({})",
            names.len(),
            names.join(", ")
        );
        Ok(())
    }
}

/// Pick the entities named in a comma-separated filter, or all of them
fn select_entities<'a>(
    config: &'a SourceConfig,
    filter: Option<&str>,
) -> Result<Vec<&'a EntityDefinition>> {
    let names: Vec<&str> = filter
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if names.is_empty() {
        return Ok(config.entities.iter().collect());
    }
    names.into_iter().map(|name| config.entity(name)).collect()
}

fn render(value: &JsonValue, format: OutputFormat) -> Result<String> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string(value)?,
        OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
    };
    Ok(rendered)
}

fn write_output(rendered: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, format!("{rendered}\n"))?;
            info!("Wrote {}", path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
