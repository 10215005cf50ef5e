/// Scenario enrichment through an LLM completion service
///
/// This module provides:
/// - The `CompletionClient` seam and an OpenAI-compatible client
/// - Prompt construction from the event, vessels and seeds
/// - Tolerant JSON extraction from free-form completions
/// - Positional merge of the response onto the seeds, and the seed-only fallback

pub mod client;
pub mod merge;
pub mod models;
pub mod parser;
pub mod prompt;
pub mod service;

pub use client::{CompletionClient, OpenAiClient};
pub use merge::{fallback_scenarios, merge_scenarios};
pub use models::{ChatMessage, ChatRole, CompletionRequest, EnrichmentConfig};
pub use parser::{extract_json, parse_response, ResponseShape};
pub use prompt::build_messages;
pub use service::ScenarioEnricher;
