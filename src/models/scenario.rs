use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Deterministic mitigation option before narrative enrichment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScenarioSeed {
    pub scenario_id: String,
    pub name: String,
    pub delay_hours: i64,
    pub cost_impact_eur: i64,
    pub description: String,
}

/// Legal exposure rating attached to a scenario
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, EnumString, Display)]
#[strum(ascii_case_insensitive)]
pub enum LegalRisk {
    Low,
    Medium,
    High,
}

impl Default for LegalRisk {
    fn default() -> Self {
        LegalRisk::Medium
    }
}

/// A seed with rationale, legal risk and confidence attached
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    #[serde(flatten)]
    pub seed: ScenarioSeed,

    pub rationale: String,

    pub legal_risk: LegalRisk,

    /// 0 - 100
    pub confidence_score: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub co2_impact_kg: Option<f64>,

    /// 0 - 100
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operational_efficiency: Option<f64>,

    pub assumptions: Vec<String>,
}

impl Scenario {
    /// Attach fixed narrative fields to a seed
    pub fn from_seed(
        seed: ScenarioSeed,
        rationale: impl Into<String>,
        legal_risk: LegalRisk,
        confidence_score: f64,
        assumptions: Vec<String>,
    ) -> Self {
        Self {
            seed,
            rationale: rationale.into(),
            legal_risk,
            confidence_score,
            co2_impact_kg: None,
            operational_efficiency: None,
            assumptions,
        }
    }

    pub fn scenario_id(&self) -> &str {
        &self.seed.scenario_id
    }
}
