/// Deterministic mitigation scenario seeds

pub mod seeds;

pub use seeds::{
    generate_seeds, scenario_ids, SeedBasis, BASE_COST_RATE, BASE_DELAY_HOURS,
    HIGH_RISK_BASE_DELAY_HOURS, SCENARIO_COUNT,
};
