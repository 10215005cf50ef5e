use crate::models::{EventFeature, ScenarioSeed, VesselAffected};

/// Number of scenarios every analysis produces
pub const SCENARIO_COUNT: usize = 5;

/// Base delay when at least one vessel is in the high-risk band
pub const HIGH_RISK_BASE_DELAY_HOURS: i64 = 72;

/// Base delay otherwise
pub const BASE_DELAY_HOURS: i64 = 48;

/// Share of total cargo value charged as base cost
pub const BASE_COST_RATE: f64 = 0.05;

struct SeedTemplate {
    scenario_id: &'static str,
    name: &'static str,
    delay_offset_hours: i64,
    cost_rate: f64,
    description: &'static str,
}

const TEMPLATES: [SeedTemplate; SCENARIO_COUNT] = [
    SeedTemplate {
        scenario_id: "SCN-001",
        name: "Strategic Reroute (Cape of Good Hope)",
        delay_offset_hours: 96,
        cost_rate: 0.12,
        description: "Reroute affected vessels via Cape of Good Hope, avoiding the disruption zone entirely. Longest route but safest option.",
    },
    SeedTemplate {
        scenario_id: "SCN-002",
        name: "Alternative Port (transshipment hub)",
        delay_offset_hours: 24,
        cost_rate: 0.08,
        description: "Divert to alternative port for transshipment. Moderate delay with additional port fees and handling costs.",
    },
    SeedTemplate {
        scenario_id: "SCN-003",
        name: "Wait and Proceed",
        delay_offset_hours: 0,
        cost_rate: 0.0,
        description: "Maintain current course and wait for disruption to resolve. Lowest cost but uncertain timeline.",
    },
    SeedTemplate {
        scenario_id: "SCN-004",
        name: "Partial Air Freight",
        delay_offset_hours: -36,
        cost_rate: 0.35,
        description: "Air freight critical cargo components while vessels proceed normally. Fastest but most expensive option.",
    },
    SeedTemplate {
        scenario_id: "SCN-005",
        name: "Emergency Transshipment",
        delay_offset_hours: 12,
        cost_rate: 0.15,
        description: "Emergency transshipment at nearest safe port. Balanced approach with moderate cost and delay impact.",
    },
];

/// Aggregate figures the seeds are derived from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeedBasis {
    pub has_high_risk: bool,
    pub base_delay_hours: i64,
    pub total_value: f64,
    pub base_cost: i64,
}

impl SeedBasis {
    pub fn from_vessels(vessels_affected: &[VesselAffected]) -> Self {
        let has_high_risk = vessels_affected.iter().any(VesselAffected::is_high_risk);
        let total_value: f64 = vessels_affected
            .iter()
            .map(|v| v.value_eur.unwrap_or(0.0))
            .sum();

        Self {
            has_high_risk,
            base_delay_hours: if has_high_risk {
                HIGH_RISK_BASE_DELAY_HOURS
            } else {
                BASE_DELAY_HOURS
            },
            total_value,
            base_cost: percent_of(total_value, BASE_COST_RATE),
        }
    }
}

fn percent_of(total: f64, rate: f64) -> i64 {
    (total * rate).round() as i64
}

/// Canonical scenario ids in output order
pub fn scenario_ids() -> [&'static str; SCENARIO_COUNT] {
    TEMPLATES.map(|t| t.scenario_id)
}

/// Derive the five mitigation seeds. Pure: same input, same output.
pub fn generate_seeds(
    _event: &EventFeature,
    vessels_affected: &[VesselAffected],
) -> Vec<ScenarioSeed> {
    let basis = SeedBasis::from_vessels(vessels_affected);

    TEMPLATES
        .iter()
        .map(|t| ScenarioSeed {
            scenario_id: t.scenario_id.to_string(),
            name: t.name.to_string(),
            delay_hours: basis.base_delay_hours + t.delay_offset_hours,
            cost_impact_eur: basis.base_cost + percent_of(basis.total_value, t.cost_rate),
            description: t.description.to_string(),
        })
        .collect()
}
