use crate::models::{LegalRisk, Scenario, ScenarioSeed};
use serde_json::{Map, Value};
use std::str::FromStr;
use tracing::debug;

pub const DEFAULT_RATIONALE: &str = "Analysis pending";
pub const DEFAULT_CONFIDENCE: f64 = 75.0;
pub const FALLBACK_CONFIDENCE: f64 = 50.0;
pub const DEFAULT_ASSUMPTION: &str = "Standard operational conditions apply";

fn default_assumptions() -> Vec<String> {
    vec![DEFAULT_ASSUMPTION.to_string()]
}

fn non_empty_str<'a>(entry: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    entry
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

fn number(entry: &Map<String, Value>, key: &str) -> Option<f64> {
    entry.get(key).and_then(Value::as_f64).filter(|n| n.is_finite())
}

fn percentage(entry: &Map<String, Value>, key: &str) -> Option<f64> {
    number(entry, key).filter(|n| (0.0..=100.0).contains(n))
}

fn string_list(entry: &Map<String, Value>, key: &str) -> Option<Vec<String>> {
    entry.get(key)?.as_array()?.iter().map(|v| v.as_str().map(str::to_string)).collect()
}

/// Merge one external entry onto its seed
fn merge_entry(seed: &ScenarioSeed, entry: &Map<String, Value>) -> Scenario {
    for (key, pinned) in [("scenario_id", &seed.scenario_id), ("name", &seed.name)] {
        if let Some(external) = non_empty_str(entry, key).filter(|v| *v != pinned.as_str()) {
            debug!(
                scenario_id = %seed.scenario_id,
                field = key,
                external = external,
                "Ignoring enrichment value for pinned field"
            );
        }
    }

    let merged_seed = ScenarioSeed {
        scenario_id: seed.scenario_id.clone(),
        name: seed.name.clone(),
        delay_hours: number(entry, "delay_hours")
            .map(|n| n.round() as i64)
            .unwrap_or(seed.delay_hours),
        cost_impact_eur: number(entry, "cost_impact_eur")
            .map(|n| n.round() as i64)
            .unwrap_or(seed.cost_impact_eur),
        description: non_empty_str(entry, "description")
            .map(str::to_string)
            .unwrap_or_else(|| seed.description.clone()),
    };

    let legal_risk = entry
        .get("legal_risk")
        .and_then(Value::as_str)
        .and_then(|s| LegalRisk::from_str(s.trim()).ok())
        .unwrap_or_default();

    Scenario {
        seed: merged_seed,
        rationale: non_empty_str(entry, "rationale")
            .unwrap_or(DEFAULT_RATIONALE)
            .to_string(),
        legal_risk,
        confidence_score: percentage(entry, "confidence_score").unwrap_or(DEFAULT_CONFIDENCE),
        co2_impact_kg: number(entry, "co2_impact_kg"),
        operational_efficiency: percentage(entry, "operational_efficiency"),
        assumptions: string_list(entry, "assumptions").unwrap_or_else(default_assumptions),
    }
}

/// Positional merge of external entries onto seeds.
///
/// The result always has one scenario per seed: extra entries are dropped and
/// missing or non-object entries merge as an empty object.
pub fn merge_scenarios(seeds: &[ScenarioSeed], entries: &[Value]) -> Vec<Scenario> {
    let empty = Map::new();
    if entries.len() != seeds.len() {
        debug!(
            expected = seeds.len(),
            received = entries.len(),
            "Normalizing enrichment entry count"
        );
    }

    seeds
        .iter()
        .enumerate()
        .map(|(i, seed)| {
            let entry = entries.get(i).and_then(Value::as_object).unwrap_or(&empty);
            merge_entry(seed, entry)
        })
        .collect()
}

/// Seed-only scenarios used when enrichment is unavailable
pub fn fallback_scenarios(seeds: &[ScenarioSeed], service_name: &str) -> Vec<Scenario> {
    let rationale = format!("{} - {} service unavailable", DEFAULT_RATIONALE, service_name);
    seeds
        .iter()
        .map(|seed| {
            Scenario::from_seed(
                seed.clone(),
                rationale.clone(),
                LegalRisk::Medium,
                FALLBACK_CONFIDENCE,
                default_assumptions(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn seeds() -> Vec<ScenarioSeed> {
        (1..=5)
            .map(|i| ScenarioSeed {
                scenario_id: format!("SCN-00{}", i),
                name: format!("Option {}", i),
                delay_hours: 10 * i,
                cost_impact_eur: 1000 * i,
                description: format!("Seed description {}", i),
            })
            .collect()
    }

    #[test]
    fn test_full_entry_overrides_free_fields() {
        let entries = vec![json!({
            "delay_hours": 99.6,
            "cost_impact_eur": 12345,
            "description": "Rewritten",
            "rationale": "Port congestion is moderate",
            "legal_risk": "high",
            "confidence_score": 88,
            "co2_impact_kg": 1500.5,
            "operational_efficiency": 70,
            "assumptions": ["Berth available", "Weather clears"]
        })];

        let merged = merge_scenarios(&seeds(), &entries);
        let first = &merged[0];

        assert_eq!(first.seed.delay_hours, 100);
        assert_eq!(first.seed.cost_impact_eur, 12345);
        assert_eq!(first.seed.description, "Rewritten");
        assert_eq!(first.rationale, "Port congestion is moderate");
        assert_eq!(first.legal_risk, LegalRisk::High);
        assert_eq!(first.confidence_score, 88.0);
        assert_eq!(first.co2_impact_kg, Some(1500.5));
        assert_eq!(first.operational_efficiency, Some(70.0));
        assert_eq!(first.assumptions, vec!["Berth available", "Weather clears"]);
    }

    #[test]
    fn test_pads_missing_entries_with_defaults() {
        let merged = merge_scenarios(&seeds(), &[json!({"rationale": "only one"})]);

        assert_eq!(merged.len(), 5);
        let last = &merged[4];
        assert_eq!(last.seed, seeds()[4]);
        assert_eq!(last.rationale, DEFAULT_RATIONALE);
        assert_eq!(last.legal_risk, LegalRisk::Medium);
        assert_eq!(last.confidence_score, DEFAULT_CONFIDENCE);
        assert_eq!(last.assumptions, vec![DEFAULT_ASSUMPTION]);
        assert!(last.co2_impact_kg.is_none());
    }

    #[test]
    fn test_truncates_extra_entries() {
        let entries: Vec<Value> = (0..8).map(|i| json!({"rationale": i.to_string()})).collect();
        let merged = merge_scenarios(&seeds(), &entries);

        assert_eq!(merged.len(), 5);
        assert_eq!(merged[4].rationale, "4");
    }

    #[test]
    fn test_identity_is_pinned_to_seed() {
        let entries = vec![json!({"scenario_id": "SCN-999", "name": "Invented"})];
        let merged = merge_scenarios(&seeds(), &entries);

        assert_eq!(merged[0].scenario_id(), "SCN-001");
        assert_eq!(merged[0].seed.name, "Option 1");
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let entries = vec![
            json!({
                "legal_risk": "catastrophic",
                "confidence_score": 140,
                "operational_efficiency": -5,
                "co2_impact_kg": "lots",
                "assumptions": ["ok", 3],
                "delay_hours": "soon",
                "description": ""
            }),
            json!("not an object"),
        ];
        let merged = merge_scenarios(&seeds(), &entries);

        let first = &merged[0];
        assert_eq!(first.legal_risk, LegalRisk::Medium);
        assert_eq!(first.confidence_score, DEFAULT_CONFIDENCE);
        assert!(first.operational_efficiency.is_none());
        assert!(first.co2_impact_kg.is_none());
        assert_eq!(first.assumptions, vec![DEFAULT_ASSUMPTION]);
        assert_eq!(first.seed.delay_hours, 10);
        assert_eq!(first.seed.description, "Seed description 1");

        assert_eq!(merged[1].rationale, DEFAULT_RATIONALE);
    }

    #[test]
    fn test_fallback_scenarios() {
        let fallback = fallback_scenarios(&seeds(), "OpenAI");

        assert_eq!(fallback.len(), 5);
        for (scenario, seed) in fallback.iter().zip(seeds()) {
            assert_eq!(scenario.seed, seed);
            assert_eq!(scenario.rationale, "Analysis pending - OpenAI service unavailable");
            assert_eq!(scenario.legal_risk, LegalRisk::Medium);
            assert_eq!(scenario.confidence_score, 50.0);
            assert_eq!(scenario.assumptions, vec![DEFAULT_ASSUMPTION]);
        }
    }
}
