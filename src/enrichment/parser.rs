use crate::error::{AppError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

/// Opening code fence, with or without a `json` language tag
static FENCE_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```(?:json)?\s*").expect("valid regex"));

/// Top-level layout of a parsed enrichment response
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseShape {
    Array(Vec<Value>),
    ObjectWithScenariosKey(Vec<Value>),
    ObjectWithScenarioKey(Vec<Value>),
    SingleObject(Value),
    Unrecognized(Value),
}

impl ResponseShape {
    pub fn classify(value: Value) -> Self {
        match value {
            Value::Array(entries) => ResponseShape::Array(entries),
            Value::Object(mut map) => {
                if matches!(map.get("scenarios"), Some(Value::Array(_))) {
                    if let Some(Value::Array(entries)) = map.remove("scenarios") {
                        return ResponseShape::ObjectWithScenariosKey(entries);
                    }
                }
                if matches!(map.get("scenario"), Some(Value::Array(_))) {
                    if let Some(Value::Array(entries)) = map.remove("scenario") {
                        return ResponseShape::ObjectWithScenarioKey(entries);
                    }
                }
                ResponseShape::SingleObject(Value::Object(map))
            }
            other => ResponseShape::Unrecognized(other),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ResponseShape::Array(_) => "array",
            ResponseShape::ObjectWithScenariosKey(_) => "object with scenarios key",
            ResponseShape::ObjectWithScenarioKey(_) => "object with scenario key",
            ResponseShape::SingleObject(_) => "single object",
            ResponseShape::Unrecognized(_) => "unrecognized",
        }
    }

    /// Flatten into scenario entries; a lone object counts as one entry
    pub fn into_entries(self) -> Result<Vec<Value>> {
        match self {
            ResponseShape::Array(entries)
            | ResponseShape::ObjectWithScenariosKey(entries)
            | ResponseShape::ObjectWithScenarioKey(entries) => Ok(entries),
            ResponseShape::SingleObject(entry) => Ok(vec![entry]),
            ResponseShape::Unrecognized(value) => Err(AppError::EnrichmentParse(format!(
                "enrichment: unrecognized response structure: {}",
                truncate(&value.to_string(), 120)
            ))),
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// Parse one complete array or object starting at `text`, ignoring whatever follows it
fn leading_value(text: &str) -> Option<Value> {
    if !text.starts_with(['[', '{']) {
        return None;
    }
    match serde_json::Deserializer::from_str(text)
        .into_iter::<Value>()
        .next()?
    {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(error = %e, "Candidate JSON did not parse");
            None
        }
    }
}

/// Pull a JSON value out of free-form completion text.
///
/// Tries the whole text, then the body of each code fence in order, then every
/// `[` or `{` in order. The first complete value found wins.
pub fn extract_json(content: &str) -> Result<Value> {
    let trimmed = content.trim();
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Ok(value);
    }

    for fence in FENCE_OPEN.find_iter(trimmed) {
        if let Some(value) = leading_value(&trimmed[fence.end()..]) {
            debug!(offset = fence.end(), "Extracted JSON from fenced block");
            return Ok(value);
        }
    }

    for (offset, _) in trimmed.match_indices(['[', '{']) {
        if let Some(value) = leading_value(&trimmed[offset..]) {
            debug!(offset, "Extracted JSON from completion text");
            return Ok(value);
        }
    }

    Err(AppError::EnrichmentParse(format!(
        "enrichment: failed to parse response as JSON: {}",
        truncate(trimmed, 120)
    )))
}

/// Parse completion text into the list of scenario entries
pub fn parse_response(content: &str) -> Result<Vec<Value>> {
    let shape = ResponseShape::classify(extract_json(content)?);
    debug!(shape = shape.name(), "Classified enrichment response");
    shape.into_entries()
}
