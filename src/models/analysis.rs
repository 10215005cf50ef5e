use crate::models::{Coordinates, RiskCounts, Scenario, VesselAffected};
use chrono::{DateTime, Utc};
use geojson::JsonObject;
use serde::{Deserialize, Serialize};

/// Complete output of one analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Correlates this run's logs and result
    pub trace_id: String,

    pub event: AnalyzedEvent,

    pub vessels_affected: Vec<VesselAffected>,

    /// Always exactly five, `SCN-001` through `SCN-005`
    pub scenarios: Vec<Scenario>,

    /// Non-fatal anomalies encountered during the run
    pub warnings: Vec<String>,

    pub metadata: AnalysisMetadata,

    /// Scenarios came from seed data because enrichment failed
    #[serde(skip)]
    pub enrichment_fallback: bool,
}

impl AnalysisResult {
    /// Whether enrichment fell back to seed-only scenarios
    pub fn is_degraded(&self) -> bool {
        self.enrichment_fallback
    }
}

/// The event chosen for analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzedEvent {
    pub id: String,

    #[serde(rename = "type")]
    pub event_type: String,

    pub location: Coordinates,

    pub properties: JsonObject,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    pub analysis_timestamp: DateTime<Utc>,
    pub total_vessels_analyzed: usize,
    pub high_risk_count: usize,
    pub medium_risk_count: usize,
    pub low_risk_count: usize,
}

impl AnalysisMetadata {
    pub fn new(analysis_timestamp: DateTime<Utc>, vessels: &[VesselAffected]) -> Self {
        let counts = RiskCounts::tally(vessels);
        Self {
            analysis_timestamp,
            total_vessels_analyzed: vessels.len(),
            high_risk_count: counts.high,
            medium_risk_count: counts.medium,
            low_risk_count: counts.low,
        }
    }
}
