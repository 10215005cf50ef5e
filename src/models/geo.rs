use geojson::{Feature, JsonObject, Value as GeometryValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Discriminator property separating events from vessels
pub const FEATURE_KIND_PROPERTY: &str = "feature_kind";

/// Presence of this property marks a feature as a vessel
pub const VESSEL_NAME_PROPERTY: &str = "vessel_name";

/// A WGS84 position in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Build from a GeoJSON position, which is ordered `[longitude, latitude]`
    pub fn from_position(position: &[f64]) -> Option<Self> {
        match position {
            [lng, lat, ..] => Some(Self::new(*lat, *lng)),
            _ => None,
        }
    }
}

/// A located feature with its raw property bag
#[derive(Debug, Clone, PartialEq)]
pub struct GeoFeature {
    pub location: Coordinates,
    pub properties: JsonObject,
}

impl GeoFeature {
    pub fn new(location: Coordinates, properties: JsonObject) -> Self {
        Self {
            location,
            properties,
        }
    }

    /// Convert a GeoJSON feature. Returns `None` unless the geometry is a point.
    pub fn from_geojson(feature: &Feature) -> Option<Self> {
        let location = match feature.geometry.as_ref().map(|g| &g.value) {
            Some(GeometryValue::Point(position)) => Coordinates::from_position(position)?,
            _ => return None,
        };

        Some(Self::new(
            location,
            feature.properties.clone().unwrap_or_default(),
        ))
    }

    /// Feature declares `feature_kind = "event"`
    pub fn is_event(properties: Option<&JsonObject>) -> bool {
        properties
            .and_then(|p| p.get(FEATURE_KIND_PROPERTY))
            .and_then(Value::as_str)
            == Some("event")
    }

    /// Feature declares `feature_kind = "vessel"` or carries a vessel name
    pub fn is_vessel(properties: Option<&JsonObject>) -> bool {
        match properties {
            Some(p) => {
                p.get(FEATURE_KIND_PROPERTY).and_then(Value::as_str) == Some("vessel")
                    || p.contains_key(VESSEL_NAME_PROPERTY)
            }
            None => false,
        }
    }

    /// Non-empty string property
    pub fn str_property(&self, key: &str) -> Option<&str> {
        self.properties
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Numeric property
    pub fn number_property(&self, key: &str) -> Option<f64> {
        self.properties.get(key).and_then(Value::as_f64)
    }

    /// Identifier property, accepting either a string or a number
    pub fn id_property(&self) -> Option<String> {
        match self.properties.get("id") {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// The disruption being analyzed
#[derive(Debug, Clone, PartialEq)]
pub struct EventFeature(pub GeoFeature);

impl EventFeature {
    pub fn location(&self) -> Coordinates {
        self.0.location
    }

    pub fn properties(&self) -> &JsonObject {
        &self.0.properties
    }

    pub fn id(&self) -> String {
        self.0.id_property().unwrap_or_else(|| "unknown".to_string())
    }

    /// Event type label, taken from the discriminator
    pub fn kind(&self) -> String {
        self.0
            .str_property(FEATURE_KIND_PROPERTY)
            .unwrap_or("event")
            .to_string()
    }
}

/// A tracked transport asset
#[derive(Debug, Clone, PartialEq)]
pub struct VesselFeature(pub GeoFeature);

impl VesselFeature {
    pub fn location(&self) -> Coordinates {
        self.0.location
    }

    pub fn id(&self) -> Option<String> {
        self.0.id_property()
    }

    pub fn name(&self) -> Option<&str> {
        self.0.str_property(VESSEL_NAME_PROPERTY)
    }

    pub fn cargo(&self) -> Option<&str> {
        self.0.str_property("cargo")
    }

    pub fn value_eur(&self) -> Option<f64> {
        self.0.number_property("value_eur")
    }

    pub fn origin(&self) -> Option<&str> {
        self.0.str_property("origin")
    }

    pub fn destination(&self) -> Option<&str> {
        self.0.str_property("destination")
    }

    pub fn status(&self) -> Option<&str> {
        self.0.str_property("status")
    }
}
