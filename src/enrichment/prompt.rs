use crate::enrichment::models::ChatMessage;
use crate::models::{EventFeature, ScenarioSeed, VesselAffected};
use std::fmt::Write;

const SYSTEM_PROMPT: &str = "You are an expert in maritime logistics and supply chain risk management.
Your task is to analyze decision scenarios and provide structured, explainable recommendations.
Always output valid JSON only, no additional text or markdown formatting.";

const RESPONSE_SCHEMA: &str = r#"Generate a JSON array with 5 scenario objects. Each scenario must include:
{
  "scenario_id": "string (from seed)",
  "name": "string (from seed)",
  "delay_hours": number (from seed),
  "cost_impact_eur": number (from seed),
  "description": "string (from seed)",
  "rationale": "string (detailed explanation of why this scenario is viable)",
  "legal_risk": "Low" | "Medium" | "High",
  "confidence_score": number (0-100),
  "co2_impact_kg": number (optional, estimated CO2 impact),
  "operational_efficiency": number (optional, 0-100),
  "assumptions": ["string"] (array of key assumptions)
}

Output ONLY the JSON array, no markdown, no code blocks, no explanations."#;

/// Group the integer part of a value in thousands: `1234567.5` -> `1,234,567.5`
pub fn format_thousands(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    let sign = if rounded < 0.0 { "-" } else { "" };
    let abs = rounded.abs();
    let whole = abs.trunc() as u64;
    let fraction = abs - abs.trunc();

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if fraction > 0.0 {
        let cents = format!("{:.2}", fraction);
        grouped.push_str(cents.trim_start_matches('0').trim_end_matches('0'));
    }

    format!("{}{}", sign, grouped)
}

fn vessel_line(v: &VesselAffected) -> String {
    format!(
        "- {} ({}): {}nm away, Risk: {}, Cargo: {}, Value: €{}",
        v.vessel_name,
        v.vessel_id,
        v.distance_nm,
        v.risk_level,
        v.cargo.as_deref().unwrap_or("Unknown"),
        v.value_eur
            .map(format_thousands)
            .unwrap_or_else(|| "Unknown".to_string()),
    )
}

fn seed_line(s: &ScenarioSeed) -> String {
    format!(
        "- {}: {} (Delay: {}h, Cost: €{})",
        s.scenario_id,
        s.name,
        s.delay_hours,
        format_thousands(s.cost_impact_eur as f64),
    )
}

/// Build the system and user turns asking for five enriched scenarios
pub fn build_messages(
    event: &EventFeature,
    vessels_affected: &[VesselAffected],
    seeds: &[ScenarioSeed],
) -> Vec<ChatMessage> {
    let location = event.location();
    let mut user = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(
        user,
        "Analyze the following supply chain disruption scenario and generate structured scenario objects.\n"
    );
    let _ = writeln!(user, "EVENT:");
    let _ = writeln!(user, "- ID: {}", event.id());
    let _ = writeln!(user, "- Type: {}", event.kind());
    let _ = writeln!(user, "- Location: {}, {}\n", location.lat, location.lng);

    let _ = writeln!(user, "AFFECTED VESSELS:");
    for v in vessels_affected {
        let _ = writeln!(user, "{}", vessel_line(v));
    }

    let _ = writeln!(user, "\nSCENARIO SEEDS:");
    for s in seeds {
        let _ = writeln!(user, "{}", seed_line(s));
    }

    let _ = write!(user, "\n{}", RESPONSE_SCHEMA);

    vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(user)]
}
