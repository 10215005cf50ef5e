/// Feature extraction from GeoJSON input
///
/// Loads the incident and shipping collections and turns them into typed
/// event and vessel records. Only the incident collection is searched for
/// events; vessels are gathered from both, incident file first.

pub mod extractor;
pub mod loader;

pub use extractor::{extract, extract_events, extract_vessels, ExtractedFeatures, Selection};
pub use loader::{load_collection, parse_collection, INCIDENT_FILE, SHIPPING_FILE};
