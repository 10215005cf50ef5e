/// Geodesic distance and exposure classification

pub mod classifier;
pub mod geodesy;

pub use classifier::{
    assess_vessel, assess_vessels, classify_risk, vessel_slug, HIGH_RISK_MAX_NM,
    MEDIUM_RISK_MAX_NM,
};
pub use geodesy::{distance_nm, EARTH_RADIUS_NM};
