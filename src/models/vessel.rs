use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Exposure tier derived from distance to the event
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

/// A vessel measured against the analyzed event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VesselAffected {
    pub vessel_id: String,
    pub vessel_name: String,

    /// Great-circle distance to the event, nautical miles, two decimals
    pub distance_nm: f64,

    pub risk_level: RiskLevel,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cargo: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_eur: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl VesselAffected {
    pub fn is_high_risk(&self) -> bool {
        self.risk_level == RiskLevel::High
    }
}

/// Tally of vessels per risk tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RiskCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl RiskCounts {
    pub fn tally(vessels: &[VesselAffected]) -> Self {
        vessels.iter().fold(Self::default(), |mut acc, v| {
            match v.risk_level {
                RiskLevel::High => acc.high += 1,
                RiskLevel::Medium => acc.medium += 1,
                RiskLevel::Low => acc.low += 1,
            }
            acc
        })
    }
}
