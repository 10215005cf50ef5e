use crate::enrichment::{fallback_scenarios, ScenarioEnricher};
use crate::error::{AppError, Result};
use crate::ids::{IdGenerator, UuidIdGenerator};
use crate::ingest::{extract, load_collection, INCIDENT_FILE, SHIPPING_FILE};
use crate::metrics::{
    ANALYSES_TOTAL, ANALYSIS_DURATION_SECONDS, ENRICHMENT_FALLBACKS_TOTAL,
    ENRICHMENT_REQUESTS_TOTAL, VESSELS_CLASSIFIED_TOTAL,
};
use crate::models::{
    AnalysisMetadata, AnalysisResult, AnalyzedEvent, EventFeature, Scenario, ScenarioSeed,
    VesselAffected,
};
use crate::risk::assess_vessels;
use crate::scenarios::generate_seeds;
use chrono::Utc;
use geojson::FeatureCollection;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Where the two input collections live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFiles {
    pub data_dir: PathBuf,
    pub incident_file: String,
    pub shipping_file: String,
}

impl DataFiles {
    /// Default file names inside `data_dir`
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            incident_file: INCIDENT_FILE.to_string(),
            shipping_file: SHIPPING_FILE.to_string(),
        }
    }
}

/// Runs the analysis pipeline; shared behind `Arc` by the HTTP server
pub struct AnalysisService {
    files: DataFiles,
    enricher: ScenarioEnricher,
    ids: Arc<dyn IdGenerator>,
}

impl AnalysisService {
    pub fn new(files: DataFiles, enricher: ScenarioEnricher, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            files,
            enricher,
            ids,
        }
    }

    /// Service with random identifiers
    pub fn with_uuid_ids(files: DataFiles, enricher: ScenarioEnricher) -> Self {
        Self::new(files, enricher, Arc::new(UuidIdGenerator))
    }

    /// Load both collections from `data_dir` (or the configured directory) and analyze them
    pub async fn run(&self, data_dir: Option<&Path>) -> Result<AnalysisResult> {
        let start = Instant::now();
        let dir = data_dir.unwrap_or(self.files.data_dir.as_path());

        tracing::info!(data_dir = %dir.display(), "Starting analysis run");

        let outcome = async {
            let incident = load_collection(&dir.join(&self.files.incident_file)).await?;
            let shipping = load_collection(&dir.join(&self.files.shipping_file)).await?;
            self.pipeline(&incident, &shipping).await
        }
        .await
        .map_err(AppError::analysis);

        observe(start, outcome)
    }

    /// Analyze collections that are already in memory
    pub async fn analyze(
        &self,
        incident: &FeatureCollection,
        shipping: &FeatureCollection,
    ) -> Result<AnalysisResult> {
        let start = Instant::now();
        let outcome = self
            .pipeline(incident, shipping)
            .await
            .map_err(AppError::analysis);
        observe(start, outcome)
    }

    async fn pipeline(
        &self,
        incident: &FeatureCollection,
        shipping: &FeatureCollection,
    ) -> Result<AnalysisResult> {
        let trace_id = self.ids.trace_id();
        let extracted = extract(incident, shipping)?;
        let mut warnings = extracted.warnings;

        let event = extracted.event;
        let vessels_affected = assess_vessels(event.location(), &extracted.vessels, &*self.ids);
        for vessel in &vessels_affected {
            let level = vessel.risk_level.to_string();
            VESSELS_CLASSIFIED_TOTAL
                .with_label_values(&[level.as_str()])
                .inc();
        }

        let seeds = generate_seeds(&event, &vessels_affected);

        tracing::info!(
            trace_id = %trace_id,
            event_id = %event.id(),
            vessels = vessels_affected.len(),
            "Classified vessels, enriching scenarios"
        );

        let (scenarios, enrichment_fallback) = self
            .enrich_or_fallback(&event, &vessels_affected, &seeds, &mut warnings)
            .await?;

        let metadata = AnalysisMetadata::new(Utc::now(), &vessels_affected);

        tracing::info!(
            trace_id = %trace_id,
            high = metadata.high_risk_count,
            medium = metadata.medium_risk_count,
            low = metadata.low_risk_count,
            warnings = warnings.len(),
            "Analysis complete"
        );

        Ok(AnalysisResult {
            trace_id,
            event: AnalyzedEvent {
                id: event.id(),
                event_type: event.kind(),
                location: event.location(),
                properties: event.properties().clone(),
            },
            vessels_affected,
            scenarios,
            warnings,
            metadata,
            enrichment_fallback,
        })
    }

    /// Recoverable enrichment failures become a warning plus seed-only scenarios;
    /// the flag reports whether that fallback was taken
    async fn enrich_or_fallback(
        &self,
        event: &EventFeature,
        vessels_affected: &[VesselAffected],
        seeds: &[ScenarioSeed],
        warnings: &mut Vec<String>,
    ) -> Result<(Vec<Scenario>, bool)> {
        let service = self.enricher.service_name();

        match self.enricher.enrich(event, vessels_affected, seeds).await {
            Ok(scenarios) => {
                ENRICHMENT_REQUESTS_TOTAL.with_label_values(&["success"]).inc();
                Ok((scenarios, false))
            }
            Err(e) if e.is_recoverable() => {
                let label = match &e {
                    AppError::Configuration(_) => "unconfigured",
                    AppError::EnrichmentParse(_) => "parse_error",
                    _ => "service_error",
                };
                ENRICHMENT_REQUESTS_TOTAL.with_label_values(&[label]).inc();
                ENRICHMENT_FALLBACKS_TOTAL.inc();

                tracing::warn!(
                    service = %service,
                    error = %e,
                    "Scenario enrichment failed, using seed data"
                );
                warnings.push(format!(
                    "{} generation failed: {}. Using seed data only.",
                    service, e
                ));
                Ok((fallback_scenarios(seeds, service), true))
            }
            Err(e) => Err(e),
        }
    }
}

fn observe(start: Instant, outcome: Result<AnalysisResult>) -> Result<AnalysisResult> {
    ANALYSIS_DURATION_SECONDS.observe(start.elapsed().as_secs_f64());

    let label = match &outcome {
        Ok(result) if result.is_degraded() => "degraded",
        Ok(_) => "success",
        Err(e) => {
            tracing::error!(error = %e, root_cause = %e.root_cause(), "Analysis failed");
            "failed"
        }
    };
    ANALYSES_TOTAL.with_label_values(&[label]).inc();

    outcome
}
