//! Example: building a rule set and material library in code (without the
//! embedded defaults).
//! Run with: cargo run --example custom_rules [path/to/snapshot.json]

use std::path::Path;
use std::sync::Arc;

use designcheck::{
    load_snapshot, AnalysisPipeline, CadSnapshot, DesignIntent, MaterialProperties,
    MaterialRegistry, MemoryFeedbackLog, ParamValue, Rule, RuleEngine,
};

fn main() -> Result<(), designcheck::AnalysisError> {
    let snapshot = match std::env::args().nth(1) {
        Some(path) => {
            let path = Path::new(&path);
            if !path.exists() {
                eprintln!("File not found: {}", path.display());
                eprintln!("Usage: cargo run --example custom_rules [path/to/snapshot.json]");
                std::process::exit(1);
            }
            load_snapshot(path)?
        }
        None => CadSnapshot::sample_drone_arm(),
    };

    // A print-farm rule set: lighter parts, coarser fillets, PLA only.
    let rules = vec![
        Rule {
            id: "max_weight_printfarm".to_string(),
            parameter: "weight_g".to_string(),
            min_value: None,
            max_value: Some(150.0),
            allowed_values: None,
            message: "Part too heavy for the print farm".to_string(),
        },
        Rule {
            id: "material_printable".to_string(),
            parameter: "material".to_string(),
            min_value: None,
            max_value: None,
            allowed_values: Some(vec![ParamValue::from("PLA"), ParamValue::from("ABS")]),
            message: "Material not printable on the farm".to_string(),
        },
    ];

    let mut materials = MaterialRegistry::new();
    materials.insert(
        "PLA",
        MaterialProperties {
            density_g_cm3: 1.24,
            cost_per_kg: 1.8,
            co2_kg_per_kg: 0.5,
        },
    );

    let pipeline = AnalysisPipeline::new(
        RuleEngine::new(rules),
        materials,
        Arc::new(MemoryFeedbackLog::new()),
    );

    let result = pipeline.analyze(&DesignIntent::new("printed_part"), &snapshot)?;

    println!("Custom rule set found {} violations", result.violations.len());
    for violation in &result.violations {
        println!("  [{}] {}", violation.rule_id, violation.message);
        println!("    current: {}, required: {}", violation.current, violation.required);
    }
    println!("Risk score: {:.2}", result.risk_score);

    if !result.compliance {
        std::process::exit(1);
    }
    Ok(())
}
