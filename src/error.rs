use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Input collection missing, unreadable or malformed
    #[error("Load error: {0}")]
    Load(String),

    /// Input is well-formed but cannot be analyzed (no event, no vessels)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors, including a missing enrichment credential
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The enrichment service answered with something we could not read
    #[error("Enrichment parse error: {0}")]
    EnrichmentParse(String),

    /// Transport, authorization or timeout failure talking to the enrichment service
    #[error("Enrichment service error: {0}")]
    EnrichmentService(String),

    /// Top-level wrapper for failures upstream of enrichment
    #[error("Analysis failed: {source}")]
    Analysis {
        #[source]
        source: Box<AppError>,
    },
}

impl AppError {
    /// Wrap an upstream failure as an analysis failure
    pub fn analysis(source: AppError) -> Self {
        match source {
            already @ AppError::Analysis { .. } => already,
            other => AppError::Analysis {
                source: Box::new(other),
            },
        }
    }

    /// The innermost error, looking through `Analysis` wrappers
    pub fn root_cause(&self) -> &AppError {
        match self {
            AppError::Analysis { source } => source.root_cause(),
            other => other,
        }
    }

    /// Whether the aggregator may replace this failure with fallback scenarios
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::Configuration(_)
                | AppError::EnrichmentParse(_)
                | AppError::EnrichmentService(_)
        )
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Load(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::EnrichmentParse(_) => StatusCode::BAD_GATEWAY,
            AppError::EnrichmentService(_) => StatusCode::BAD_GATEWAY,
            AppError::Analysis { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code string
    pub fn error_code(&self) -> &str {
        match self {
            AppError::Load(_) => "LOAD_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::EnrichmentParse(_) => "ENRICHMENT_PARSE_ERROR",
            AppError::EnrichmentService(_) => "ENRICHMENT_SERVICE_ERROR",
            AppError::Analysis { .. } => "ANALYSIS_ERROR",
        }
    }
}

/// Convert AppError to HTTP response
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();
        let message = self.to_string();

        tracing::error!(
            error_code = error_code,
            status_code = status.as_u16(),
            message = %message,
            "Request error"
        );

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
                "status": status.as_u16(),
            }
        }));

        (status, body).into_response()
    }
}

/// Conversion from validator::ValidationErrors
impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Conversion from config::ConfigError
impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, AppError>;
