//! Full analysis walkthrough: intent, snapshot, analysis, feedback, lessons.
//! Run with: cargo run --example demo_flow

use std::collections::BTreeMap;
use std::sync::Arc;

use designcheck::prelude::*;
use designcheck::{MaterialRegistry, MemoryFeedbackLog};
use serde_json::json;

fn main() -> anyhow::Result<()> {
    let pipeline = AnalysisPipeline::new(
        RuleEngine::with_default_rules(),
        MaterialRegistry::with_default_materials(),
        Arc::new(MemoryFeedbackLog::new()),
    );

    // Requirements captured upstream of CAD work.
    let mut intent = DesignIntent::new("drone_arm");
    intent.functional_requirements = sections(&[("max_load", json!("1000N")), ("environment", json!("outdoor"))]);
    intent.constraints = sections(&[("material", json!("Aluminium 6061")), ("max_weight", json!("500g"))]);
    intent.interfaces = sections(&[("mounting", json!("M6 bolts"))]);
    intent.design_parameters = sections(&[("wall_thickness", json!(3.0))]);
    intent.acceptance_criteria = sections(&[("safety_factor", json!(1.5))]);

    let snapshot = CadSnapshot::sample_drone_arm();

    println!("=== Analysis: {} v{} ===", intent.part_class, intent.version);
    let result = pipeline.analyze(&intent, &snapshot)?;
    print_result(&result);

    // A reviewer accepts the suggestion; the decision becomes a lesson.
    let ack = pipeline.record_feedback(
        FeedbackRecord::new(intent.design_id.clone(), Decision::Accepted)
            .with_comments("Reduced wall thickness to 2.5 mm, weight now inside budget."),
    )?;
    println!("\nFeedback {} at position {}", ack.status, ack.position);

    println!("\n=== Re-analysis with recorded lessons ===");
    let result = pipeline.analyze(&intent, &snapshot)?;
    print_result(&result);

    Ok(())
}

fn sections(entries: &[(&str, serde_json::Value)]) -> BTreeMap<String, serde_json::Value> {
    entries
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

fn print_result(result: &AnalysisResult) {
    println!("Compliance: {}", if result.compliance { "PASS" } else { "FAIL" });
    println!("Risk score: {:.2}", result.risk_score);
    match result.estimated_cost {
        Some(cost) => println!("Estimated cost: ${:.2}", cost),
        None => println!("Estimated cost: unavailable"),
    }
    match result.carbon_footprint_kg {
        Some(carbon) => println!("Carbon footprint: {:.2} kg CO2e", carbon),
        None => println!("Carbon footprint: unavailable"),
    }

    if !result.violations.is_empty() {
        println!("Violations:");
        for violation in &result.violations {
            println!(
                "  - [{}] {} (current: {}, required: {})",
                violation.rule_id, violation.message, violation.current, violation.required
            );
        }
    }

    if !result.suggested_parameter_updates.is_empty() {
        println!("Suggested parameter updates:");
        for (parameter, value) in &result.suggested_parameter_updates {
            println!("  {} -> {}", parameter, value);
        }
    }

    println!("Reasoning: {}", result.explanation);
}
