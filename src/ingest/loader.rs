use crate::error::{AppError, Result};
use geojson::{FeatureCollection, GeoJson};
use std::path::Path;
use tracing::debug;

/// Default file name of the incident collection inside a data directory
pub const INCIDENT_FILE: &str = "incident_data.geojson";

/// Default file name of the shipping collection inside a data directory
pub const SHIPPING_FILE: &str = "shipping_data.geojson";

/// Read and parse a GeoJSON FeatureCollection from disk
pub async fn load_collection(path: &Path) -> Result<FeatureCollection> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        AppError::Load(format!(
            "feature extraction: failed to load GeoJSON file {}: {}",
            path.display(),
            e
        ))
    })?;

    let collection = parse_collection(&content, &path.display().to_string())?;
    debug!(
        path = %path.display(),
        features = collection.features.len(),
        "Loaded feature collection"
    );
    Ok(collection)
}

/// Parse GeoJSON text that must be a FeatureCollection
pub fn parse_collection(text: &str, source: &str) -> Result<FeatureCollection> {
    let geojson: GeoJson = text.parse().map_err(|e| {
        AppError::Load(format!(
            "feature extraction: failed to load GeoJSON file {}: {}",
            source, e
        ))
    })?;

    match geojson {
        GeoJson::FeatureCollection(collection) => Ok(collection),
        GeoJson::Feature(_) | GeoJson::Geometry(_) => Err(AppError::Load(format!(
            "feature extraction: invalid GeoJSON format in {}: expected a FeatureCollection",
            source
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const COLLECTION: &str = r#"{
        "type": "FeatureCollection",
        "name": "incident_data",
        "features": [
            {
                "type": "Feature",
                "properties": { "id": "EVT-1", "feature_kind": "event" },
                "geometry": { "type": "Point", "coordinates": [32.2, 30.5] }
            }
        ]
    }"#;

    #[test]
    fn test_parse_feature_collection() {
        let collection = parse_collection(COLLECTION, "inline").unwrap();
        assert_eq!(collection.features.len(), 1);
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        let err = parse_collection("{ not json", "inline").unwrap_err();
        assert!(matches!(err, AppError::Load(_)));
        assert!(err.to_string().contains("inline"));
    }

    #[test]
    fn test_parse_rejects_missing_features() {
        let err = parse_collection(r#"{"type": "FeatureCollection"}"#, "inline").unwrap_err();
        assert!(matches!(err, AppError::Load(_)));

        let err = parse_collection(r#"{"features": 3}"#, "inline").unwrap_err();
        assert!(matches!(err, AppError::Load(_)));
    }

    #[test]
    fn test_parse_rejects_single_feature() {
        let feature = r#"{
            "type": "Feature",
            "properties": {},
            "geometry": { "type": "Point", "coordinates": [0.0, 0.0] }
        }"#;
        let err = parse_collection(feature, "inline").unwrap_err();
        assert!(err.to_string().contains("expected a FeatureCollection"));
    }

    #[tokio::test]
    async fn test_load_collection_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(COLLECTION.as_bytes()).unwrap();

        let collection = load_collection(file.path()).await.unwrap();
        assert_eq!(collection.features.len(), 1);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_collection(&dir.path().join(INCIDENT_FILE))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Load(_)));
        assert!(err.to_string().contains(INCIDENT_FILE));
    }
}
