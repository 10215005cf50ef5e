use crate::ids::IdGenerator;
use crate::models::{Coordinates, RiskLevel, VesselAffected, VesselFeature};
use crate::risk::geodesy::distance_nm;

/// Upper bound (inclusive) of the high-risk band, nautical miles
pub const HIGH_RISK_MAX_NM: f64 = 120.0;

/// Upper bound (inclusive) of the medium-risk band, nautical miles
pub const MEDIUM_RISK_MAX_NM: f64 = 250.0;

/// Bucket a distance into a risk tier.
///
/// Expects the already-rounded distance so that a value reported as `120.00`
/// is always classified `high`.
pub fn classify_risk(distance_nm: f64) -> RiskLevel {
    if distance_nm <= HIGH_RISK_MAX_NM {
        RiskLevel::High
    } else if distance_nm <= MEDIUM_RISK_MAX_NM {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Slug form of a vessel name: lower-cased, whitespace runs replaced by `-`
pub fn vessel_slug(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

/// Measure one vessel against the event location
pub fn assess_vessel(
    event_location: Coordinates,
    vessel: &VesselFeature,
    ids: &dyn IdGenerator,
) -> VesselAffected {
    let distance = distance_nm(event_location, vessel.location());

    let vessel_id = vessel
        .id()
        .or_else(|| vessel.name().map(vessel_slug).filter(|s| !s.is_empty()))
        .unwrap_or_else(|| ids.vessel_id());

    let vessel_name = vessel
        .name()
        .map(str::to_string)
        .or_else(|| vessel.id())
        .unwrap_or_else(|| "Unknown Vessel".to_string());

    VesselAffected {
        vessel_id,
        vessel_name,
        distance_nm: distance,
        risk_level: classify_risk(distance),
        cargo: vessel.cargo().map(str::to_string),
        value_eur: vessel.value_eur(),
        origin: vessel.origin().map(str::to_string),
        destination: vessel.destination().map(str::to_string),
        status: vessel.status().map(str::to_string),
    }
}

/// Measure every vessel against the event location, preserving order
pub fn assess_vessels(
    event_location: Coordinates,
    vessels: &[VesselFeature],
    ids: &dyn IdGenerator,
) -> Vec<VesselAffected> {
    vessels
        .iter()
        .map(|vessel| assess_vessel(event_location, vessel, ids))
        .collect()
}
