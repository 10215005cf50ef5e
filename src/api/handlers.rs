use crate::api::AppState;
use crate::error::{AppError, Result};
use crate::models::AnalysisResult;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;
use uuid::Uuid;
use validator::Validate;

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "IDSS Backend".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    })
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

/// Optional body of `POST /run-analysis`
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct RunAnalysisRequest {
    /// Overrides the configured data directory
    #[serde(rename = "dataDir", default)]
    #[validate(length(min = 1))]
    pub data_dir: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Performance {
    pub duration_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct RunAnalysisResponse {
    pub success: bool,

    #[serde(flatten)]
    pub result: AnalysisResult,

    pub performance: Performance,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RunAnalysisFailure {
    pub success: bool,
    pub error: String,
    pub trace_id: String,
    pub performance: Performance,
}

/// Run one analysis; pipeline failures are reported in the failure envelope
pub async fn run_analysis(State(state): State<AppState>, body: Bytes) -> Result<Response> {
    let start = Instant::now();

    let request: RunAnalysisRequest = if body.iter().all(u8::is_ascii_whitespace) {
        RunAnalysisRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::Validation(format!("invalid request body: {}", e)))?
    };
    request.validate()?;

    let outcome = state
        .analysis
        .run(request.data_dir.as_deref().map(Path::new))
        .await;
    let performance = Performance {
        duration_ms: start.elapsed().as_millis() as u64,
    };

    let response = match outcome {
        Ok(result) => {
            tracing::info!(
                trace_id = %result.trace_id,
                duration_ms = performance.duration_ms,
                "Analysis completed"
            );
            Json(RunAnalysisResponse {
                success: true,
                result,
                performance,
            })
            .into_response()
        }
        Err(e) => {
            let trace_id = format!("error-{}", Uuid::new_v4());
            tracing::error!(trace_id = %trace_id, error = %e, "Analysis request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(RunAnalysisFailure {
                    success: false,
                    error: e.to_string(),
                    trace_id,
                    performance,
                }),
            )
                .into_response()
        }
    };

    Ok(response)
}

/// Prometheus metrics endpoint
pub async fn metrics() -> (StatusCode, String) {
    let metrics = crate::metrics::gather_metrics();
    (StatusCode::OK, metrics)
}
