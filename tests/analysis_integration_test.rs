use async_trait::async_trait;
use idss_backend::analysis::{AnalysisService, DataFiles};
use idss_backend::enrichment::{
    CompletionClient, CompletionRequest, EnrichmentConfig, OpenAiClient, ScenarioEnricher,
};
use idss_backend::ids::SequentialIdGenerator;
use idss_backend::models::{LegalRisk, RiskLevel};
use idss_backend::{AppError, Result};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Completion client that records requests and answers from a script
struct ScriptedClient {
    reply: std::result::Result<String, String>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedClient {
    fn replying(text: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    fn name(&self) -> &str {
        "Scripted"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        self.reply
            .clone()
            .map_err(|m| AppError::EnrichmentService(format!("enrichment: {}", m)))
    }
}

fn point(lat: f64, lng: f64, properties: Value) -> Value {
    json!({
        "type": "Feature",
        "geometry": {"type": "Point", "coordinates": [lng, lat]},
        "properties": properties
    })
}

fn write_collection(dir: &Path, file: &str, features: Vec<Value>) {
    let collection = json!({"type": "FeatureCollection", "features": features});
    std::fs::write(dir.join(file), collection.to_string()).unwrap();
}

/// One event and one vessel 51.73 nm east of it
fn suez_fixture() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_collection(
        dir.path(),
        "incident_data.geojson",
        vec![point(
            30.5,
            32.2,
            json!({"feature_kind": "event", "id": "EVT-SUEZ"}),
        )],
    );
    write_collection(
        dir.path(),
        "shipping_data.geojson",
        vec![point(
            30.5,
            33.2,
            json!({"vessel_name": "Ever Given", "cargo": "Containers", "value_eur": 1000000}),
        )],
    );
    dir
}

fn service(dir: &Path, client: Option<Arc<dyn CompletionClient>>) -> AnalysisService {
    AnalysisService::new(
        DataFiles::new(dir),
        ScenarioEnricher::new(EnrichmentConfig::default(), client),
        Arc::new(SequentialIdGenerator::new()),
    )
}

#[tokio::test]
async fn test_end_to_end_with_enrichment() {
    let dir = suez_fixture();
    let reply = json!([
        {
            "scenario_id": "SCN-001",
            "rationale": "Avoids the canal entirely",
            "legal_risk": "Low",
            "confidence_score": 82,
            "co2_impact_kg": 350000,
            "assumptions": ["Fuel available at Durban"]
        },
        {"rationale": "Port Said has spare capacity", "legal_risk": "medium", "confidence_score": 70},
        {"rationale": "Salvage expected within a week", "legal_risk": "High"},
        {"rationale": "Only high-value parts fly"},
        {"rationale": "Nearest safe port is Jeddah", "operational_efficiency": 64}
    ])
    .to_string();
    let client = ScriptedClient::replying(format!("```json\n{}\n```", reply));

    let result = service(dir.path(), Some(client.clone()))
        .run(None)
        .await
        .unwrap();

    assert_eq!(result.trace_id, "trace-0001");
    assert_eq!(result.event.id, "EVT-SUEZ");
    assert_eq!(result.event.event_type, "event");
    assert!(result.warnings.is_empty());

    let vessel = &result.vessels_affected[0];
    assert_eq!(vessel.vessel_id, "ever-given");
    assert_eq!(vessel.distance_nm, 51.73);
    assert_eq!(vessel.risk_level, RiskLevel::High);

    let delays: Vec<_> = result.scenarios.iter().map(|s| s.seed.delay_hours).collect();
    assert_eq!(delays, vec![168, 96, 72, 36, 84]);
    assert_eq!(result.scenarios[0].legal_risk, LegalRisk::Low);
    assert_eq!(result.scenarios[0].co2_impact_kg, Some(350000.0));
    assert_eq!(result.scenarios[1].legal_risk, LegalRisk::Medium);
    assert_eq!(result.scenarios[2].confidence_score, 75.0);
    assert_eq!(result.scenarios[4].operational_efficiency, Some(64.0));

    assert_eq!(result.metadata.total_vessels_analyzed, 1);
    assert_eq!(result.metadata.high_risk_count, 1);

    let requests = client.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].model, "gpt-4");
    assert!(requests[0].messages[1]
        .content
        .contains("Ever Given (ever-given): 51.73nm away"));
}

#[tokio::test]
async fn test_unconfigured_enrichment_uses_seed_data() {
    let dir = suez_fixture();

    let result = service(dir.path(), None).run(None).await.unwrap();

    assert_eq!(result.scenarios.len(), 5);
    for scenario in &result.scenarios {
        assert_eq!(scenario.rationale, "Analysis pending - OpenAI service unavailable");
        assert_eq!(scenario.legal_risk, LegalRisk::Medium);
        assert_eq!(scenario.confidence_score, 50.0);
        assert_eq!(scenario.assumptions, vec!["Standard operational conditions apply"]);
    }
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].starts_with("OpenAI generation failed: Configuration error"));
}

#[tokio::test]
async fn test_failing_enrichment_uses_seed_data() {
    let dir = suez_fixture();
    let client = ScriptedClient::failing("connection reset");

    let result = service(dir.path(), Some(client)).run(None).await.unwrap();

    assert_eq!(
        result.warnings,
        vec![
            "OpenAI generation failed: Enrichment service error: enrichment: connection reset. \
             Using seed data only."
        ]
    );
    assert!(result.scenarios.iter().all(|s| s.confidence_score == 50.0));
}

#[tokio::test]
async fn test_openai_client_through_pipeline() {
    let dir = suez_fixture();
    let mut server = mockito::Server::new_async().await;
    let content = "Here are the scenarios: [{\"rationale\": \"Mocked\", \"legal_risk\": \"Low\"}]";
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer sk-integration")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"choices": [{"message": {"content": content}}]}).to_string())
        .create_async()
        .await;

    let client = OpenAiClient::new("OpenAI", server.url(), "sk-integration", 5).unwrap();
    let result = service(dir.path(), Some(Arc::new(client)))
        .run(None)
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(result.warnings.is_empty());
    assert_eq!(result.scenarios[0].rationale, "Mocked");
    assert_eq!(result.scenarios[0].legal_risk, LegalRisk::Low);
    assert_eq!(result.scenarios[1].rationale, "Analysis pending");
}

#[tokio::test]
async fn test_multiple_events_use_first() {
    let dir = tempfile::tempdir().unwrap();
    write_collection(
        dir.path(),
        "incident_data.geojson",
        vec![
            point(30.5, 32.2, json!({"feature_kind": "event", "id": "EVT-A"})),
            point(12.6, 43.4, json!({"feature_kind": "event", "id": "EVT-B"})),
            point(31.5, 32.2, json!({"feature_kind": "vessel", "vessel_name": "Near"})),
        ],
    );
    write_collection(dir.path(), "shipping_data.geojson", vec![]);

    let result = service(dir.path(), None).run(None).await.unwrap();

    assert_eq!(result.event.id, "EVT-A");
    assert!(result
        .warnings
        .contains(&"Multiple events found (2), using first event".to_string()));
    assert_eq!(result.vessels_affected[0].distance_nm, 60.04);
}

#[tokio::test]
async fn test_zero_vessels_fails_run() {
    let dir = tempfile::tempdir().unwrap();
    write_collection(
        dir.path(),
        "incident_data.geojson",
        vec![point(30.5, 32.2, json!({"feature_kind": "event"}))],
    );
    write_collection(dir.path(), "shipping_data.geojson", vec![]);

    let err = service(dir.path(), None).run(None).await.unwrap_err();

    assert!(matches!(err, AppError::Analysis { .. }));
    assert!(matches!(err.root_cause(), AppError::Validation(_)));
    assert_eq!(
        err.to_string(),
        "Analysis failed: Validation error: feature extraction: no vessels found in data files"
    );
}

#[tokio::test]
async fn test_malformed_file_fails_run() {
    let dir = suez_fixture();
    std::fs::write(dir.path().join("shipping_data.geojson"), "{not geojson").unwrap();

    let err = service(dir.path(), None).run(None).await.unwrap_err();

    assert!(matches!(err.root_cause(), AppError::Load(_)));
}

#[tokio::test]
async fn test_run_with_explicit_directory() {
    let configured = tempfile::tempdir().unwrap();
    let other = suez_fixture();

    let result = service(configured.path(), None)
        .run(Some(other.path()))
        .await
        .unwrap();

    assert_eq!(result.event.id, "EVT-SUEZ");
}
