pub mod handlers;
pub mod routes;

pub use routes::*;

use crate::analysis::AnalysisService;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub analysis: Arc<AnalysisService>,
}

impl AppState {
    pub fn new(analysis: Arc<AnalysisService>) -> Self {
        Self { analysis }
    }
}
