use crate::ai::provider::SynthesisRequest;
use crate::rules::Violation;
use crate::schema::CadSnapshot;

/// System instruction sent ahead of every synthesis prompt.
pub const SYSTEM_PROMPT: &str = "You are an engineering reasoning assistant. \
You never generate geometry. You reason only over parameters, constraints, \
and simulation results. You must return valid JSON matching the response schema.";

pub fn build_analysis_prompt(request: &SynthesisRequest) -> String {
    let intent =
        serde_json::to_string_pretty(&request.intent).unwrap_or_else(|_| "{}".to_string());
    let snapshot = summarize_snapshot(&request.snapshot);
    let violations = summarize_violations(&request.violations);
    let impact = match &request.impact {
        Some(impact) => format!(
            "Estimated cost ${:.2}, carbon footprint {:.2} kg CO2e",
            impact.cost_usd, impact.carbon_kg
        ),
        None => "Unavailable (material not in library)".to_string(),
    };
    let lessons = request.lessons.join("\n");

    format!(
        r#"Analyze the following engineering design context.

DESIGN INTENT:
{}

CURRENT CAD SNAPSHOT:
{}

DETECTED RULE VIOLATIONS:
{}

COST AND SUSTAINABILITY IMPACT:
{}

RELEVANT PAST DECISIONS:
{}

Task:
1. Evaluate compliance with the design intent.
2. Assess manufacturing, structural and cost risks.
3. Suggest parameter updates that resolve the violations.
4. Explain your reasoning.

Respond ONLY with valid JSON in this exact format (no markdown, no code blocks, just pure JSON):
{{
  "risk_score": 0.0,
  "violations": [],
  "suggested_parameter_updates": {{}},
  "explanation": ""
}}

Important: Return ONLY the JSON object, nothing else."#,
        intent, snapshot, violations, impact, lessons
    )
}

fn summarize_snapshot(snapshot: &CadSnapshot) -> String {
    let parameters = snapshot
        .design_parameters
        .iter()
        .map(|(name, value)| format!("{} = {}", name, value))
        .collect::<Vec<_>>()
        .join(", ");
    let mass = snapshot
        .mass_properties
        .iter()
        .map(|(name, value)| format!("{} = {}", name, value))
        .collect::<Vec<_>>()
        .join(", ");
    let features = snapshot
        .feature_counts
        .iter()
        .map(|(name, count)| format!("{} x{}", name, count))
        .collect::<Vec<_>>()
        .join(", ");
    let doc = &snapshot.document_properties;

    format!(
        "Parameters: {}\nMass properties: {}\nDocument: units {}, tolerance {}, image quality {}\nFeatures: {}",
        non_empty(parameters),
        non_empty(mass),
        doc.unit_system,
        doc.tolerance_standard,
        doc.image_quality,
        non_empty(features)
    )
}

fn summarize_violations(violations: &[Violation]) -> String {
    if violations.is_empty() {
        return "None detected.".to_string();
    }
    violations
        .iter()
        .map(|v| {
            format!(
                "- [{}] {} (current: {}, required: {})",
                v.rule_id, v.message, v.current, v.required
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn non_empty(s: String) -> String {
    if s.is_empty() {
        "none".to_string()
    } else {
        s
    }
}
