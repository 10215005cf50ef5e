//! IDSS backend: geospatial exposure analysis and mitigation scenarios for
//! shipping disruptions.
//!
//! A run loads an incident and a shipping GeoJSON collection, measures every
//! vessel against the event, derives five deterministic mitigation seeds and
//! asks an LLM completion service to narrate them. When the service is
//! unavailable the seeds are returned with fallback narrative fields.

pub mod analysis;
pub mod api;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod ids;
pub mod ingest;
pub mod metrics;
pub mod models;
pub mod risk;
pub mod scenarios;

pub use error::{AppError, Result};
