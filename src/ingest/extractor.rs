use crate::error::{AppError, Result};
use crate::models::{EventFeature, GeoFeature, VesselFeature};
use geojson::{FeatureCollection, JsonObject};
use tracing::{debug, warn};

const INCIDENT_SOURCE: &str = "incident data";
const SHIPPING_SOURCE: &str = "shipping data";

/// Features picked out of one collection, plus anything that had to be skipped
#[derive(Debug, Clone)]
pub struct Selection<T> {
    pub features: Vec<T>,
    pub warnings: Vec<String>,
}

/// Typed input for one analysis run
#[derive(Debug, Clone)]
pub struct ExtractedFeatures {
    /// First event in collection order
    pub event: EventFeature,

    /// Number of events found, including the one selected
    pub event_count: usize,

    /// Incident-file vessels followed by shipping-file vessels
    pub vessels: Vec<VesselFeature>,

    pub warnings: Vec<String>,
}

fn select<T>(
    collection: &FeatureCollection,
    source: &str,
    label: &str,
    matches: fn(Option<&JsonObject>) -> bool,
    wrap: fn(GeoFeature) -> T,
) -> Selection<T> {
    let mut features = Vec::new();
    let mut warnings = Vec::new();

    for (index, feature) in collection.features.iter().enumerate() {
        if !matches(feature.properties.as_ref()) {
            continue;
        }

        match GeoFeature::from_geojson(feature) {
            Some(geo) => features.push(wrap(geo)),
            None => {
                let message = format!(
                    "Skipped {} feature #{} in {}: no point geometry",
                    label, index, source
                );
                warn!("{}", message);
                warnings.push(message);
            }
        }
    }

    Selection { features, warnings }
}

/// Features with `feature_kind = "event"`, in collection order
pub fn extract_events(collection: &FeatureCollection, source: &str) -> Selection<EventFeature> {
    select(collection, source, "event", GeoFeature::is_event, EventFeature)
}

/// Features with `feature_kind = "vessel"` or a vessel name, in collection order
pub fn extract_vessels(collection: &FeatureCollection, source: &str) -> Selection<VesselFeature> {
    select(collection, source, "vessel", GeoFeature::is_vessel, VesselFeature)
}

/// Pick the event and gather the vessels of both collections
pub fn extract(
    incident: &FeatureCollection,
    shipping: &FeatureCollection,
) -> Result<ExtractedFeatures> {
    let mut warnings = Vec::new();

    let events = extract_events(incident, INCIDENT_SOURCE);
    warnings.extend(events.warnings);

    let event_count = events.features.len();
    let event = events.features.into_iter().next().ok_or_else(|| {
        AppError::Validation(format!(
            "feature extraction: no event found in {}",
            INCIDENT_SOURCE
        ))
    })?;

    if event_count > 1 {
        warnings.push(format!(
            "Multiple events found ({}), using first event",
            event_count
        ));
    }

    let incident_vessels = extract_vessels(incident, INCIDENT_SOURCE);
    let shipping_vessels = extract_vessels(shipping, SHIPPING_SOURCE);
    warnings.extend(incident_vessels.warnings);
    warnings.extend(shipping_vessels.warnings);

    let mut vessels = incident_vessels.features;
    vessels.extend(shipping_vessels.features);

    if vessels.is_empty() {
        return Err(AppError::Validation(
            "feature extraction: no vessels found in data files".to_string(),
        ));
    }

    debug!(
        event_id = %event.id(),
        event_count,
        vessel_count = vessels.len(),
        "Extracted features"
    );

    Ok(ExtractedFeatures {
        event,
        event_count,
        vessels,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::parse_collection;
    use serde_json::{json, Value};

    fn point(lng: f64, lat: f64, properties: Value) -> Value {
        json!({
            "type": "Feature",
            "properties": properties,
            "geometry": { "type": "Point", "coordinates": [lng, lat] }
        })
    }

    fn collection(features: Vec<Value>) -> FeatureCollection {
        let text = json!({ "type": "FeatureCollection", "features": features }).to_string();
        parse_collection(&text, "test").unwrap()
    }

    #[test]
    fn test_extract_single_event_and_vessels() {
        let incident = collection(vec![
            point(32.2, 30.5, json!({"id": "EVT-1", "feature_kind": "event"})),
            point(33.0, 30.0, json!({"vessel_name": "Incident Vessel"})),
        ]);
        let shipping = collection(vec![
            point(10.0, 53.5, json!({"feature_kind": "vessel", "id": "ship-1"})),
            point(9.9, 53.5, json!({"name": "Hamburg"})),
        ]);

        let extracted = extract(&incident, &shipping).unwrap();

        assert_eq!(extracted.event.id(), "EVT-1");
        assert_eq!(extracted.event_count, 1);
        assert!(extracted.warnings.is_empty());
        assert_eq!(extracted.vessels.len(), 2);
        assert_eq!(extracted.vessels[0].name(), Some("Incident Vessel"));
        assert_eq!(extracted.vessels[1].id().as_deref(), Some("ship-1"));
    }

    #[test]
    fn test_multiple_events_warns_and_uses_first() {
        let incident = collection(vec![
            point(32.2, 30.5, json!({"id": "EVT-1", "feature_kind": "event"})),
            point(40.0, 12.0, json!({"id": "EVT-2", "feature_kind": "event"})),
        ]);
        let shipping = collection(vec![point(33.2, 30.5, json!({"vessel_name": "A"}))]);

        let extracted = extract(&incident, &shipping).unwrap();

        assert_eq!(extracted.event.id(), "EVT-1");
        assert_eq!(extracted.event_count, 2);
        assert_eq!(
            extracted.warnings,
            vec!["Multiple events found (2), using first event".to_string()]
        );
    }

    #[test]
    fn test_no_event_is_validation_error() {
        let incident = collection(vec![point(33.2, 30.5, json!({"vessel_name": "A"}))]);
        let shipping = collection(vec![]);

        let err = extract(&incident, &shipping).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(err.to_string().contains("no event found"));
    }

    #[test]
    fn test_events_in_shipping_file_are_ignored() {
        let incident = collection(vec![point(33.2, 30.5, json!({"vessel_name": "A"}))]);
        let shipping = collection(vec![point(32.2, 30.5, json!({"feature_kind": "event"}))]);

        assert!(extract(&incident, &shipping).is_err());
    }

    #[test]
    fn test_no_vessels_is_validation_error() {
        let incident = collection(vec![point(
            32.2,
            30.5,
            json!({"id": "EVT-1", "feature_kind": "event"}),
        )]);
        let shipping = collection(vec![point(9.9, 53.5, json!({"name": "Hamburg"}))]);

        let err = extract(&incident, &shipping).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(err.to_string().contains("no vessels"));
    }

    #[test]
    fn test_feature_without_point_geometry_is_skipped() {
        let incident = collection(vec![
            point(32.2, 30.5, json!({"id": "EVT-1", "feature_kind": "event"})),
            json!({
                "type": "Feature",
                "properties": {"vessel_name": "Ghost"},
                "geometry": null
            }),
        ]);
        let shipping = collection(vec![point(33.2, 30.5, json!({"vessel_name": "A"}))]);

        let extracted = extract(&incident, &shipping).unwrap();

        assert_eq!(extracted.vessels.len(), 1);
        assert_eq!(extracted.warnings.len(), 1);
        assert!(extracted.warnings[0].contains("#1"));
    }
}
