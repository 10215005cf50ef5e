use crate::enrichment::client::{CompletionClient, OpenAiClient};
use crate::enrichment::merge::merge_scenarios;
use crate::enrichment::models::{CompletionRequest, EnrichmentConfig};
use crate::enrichment::parser::parse_response;
use crate::enrichment::prompt::build_messages;
use crate::error::{AppError, Result};
use crate::models::{EventFeature, Scenario, ScenarioSeed, VesselAffected};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Turns scenario seeds into narrated scenarios through a completion client
pub struct ScenarioEnricher {
    /// None when enrichment is disabled or no credential is available
    client: Option<Arc<dyn CompletionClient>>,

    config: EnrichmentConfig,
}

impl ScenarioEnricher {
    /// Create an enricher around an explicit client
    pub fn new(config: EnrichmentConfig, client: Option<Arc<dyn CompletionClient>>) -> Self {
        Self { client, config }
    }

    /// Build the production enricher; an unusable configuration leaves it unconfigured
    pub fn from_config(config: EnrichmentConfig) -> Result<Self> {
        if !config.enabled {
            info!("Scenario enrichment disabled");
            return Ok(Self::new(config, None));
        }

        let Some(api_key) = config.resolve_api_key() else {
            warn!(
                env = %config.api_key_env,
                "No API key configured, scenarios will use seed data only"
            );
            return Ok(Self::new(config, None));
        };

        let client = OpenAiClient::new(
            config.service_name.clone(),
            config.api_base_url.clone(),
            api_key,
            config.timeout_secs,
        )?;

        Ok(Self::new(config, Some(Arc::new(client))))
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    pub fn service_name(&self) -> &str {
        &self.config.service_name
    }

    /// Ask the service to narrate the seeds and merge its answer onto them
    pub async fn enrich(
        &self,
        event: &EventFeature,
        vessels_affected: &[VesselAffected],
        seeds: &[ScenarioSeed],
    ) -> Result<Vec<Scenario>> {
        let client = self.client.as_ref().ok_or_else(|| {
            AppError::Configuration(format!(
                "enrichment: {} API key not configured ({})",
                self.config.service_name, self.config.api_key_env
            ))
        })?;

        let request = CompletionRequest {
            model: self.config.model.clone(),
            messages: build_messages(event, vessels_affected, seeds),
            temperature: self.config.temperature,
        };

        let start = Instant::now();
        let limit = Duration::from_secs(self.config.timeout_secs);
        let content = timeout(limit, client.complete(&request))
            .await
            .map_err(|_| {
                AppError::EnrichmentService(format!(
                    "enrichment: {} request timed out after {}s",
                    client.name(),
                    self.config.timeout_secs
                ))
            })??;

        debug!(
            service = client.name(),
            duration_ms = start.elapsed().as_millis() as u64,
            bytes = content.len(),
            "Received enrichment response"
        );

        let entries = parse_response(&content)?;
        Ok(merge_scenarios(seeds, &entries))
    }
}
