//! Tests for rule sets loaded from files and the default rules.

use designcheck::prelude::*;
use designcheck::load_snapshot;
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_load_rules_file() {
    let engine = RuleEngine::load_rules_file(&fixture_path("custom_rules.json"))
        .expect("Should load rule file");

    assert_eq!(engine.rules().len(), 2);
    assert_eq!(engine.rules()[0].id, "max_weight_drone");
    assert_eq!(engine.rules()[1].id, "min_fillet_cnc");
}

#[test]
fn test_load_rules_file_missing_is_io_error() {
    let err = RuleEngine::load_rules_file(&fixture_path("does_not_exist.json")).unwrap_err();
    assert!(matches!(err, RuleError::Io(_)));
}

#[test]
fn test_fixture_snapshot_violates_both_custom_rules() {
    let engine = RuleEngine::load_rules_file(&fixture_path("custom_rules.json")).unwrap();
    let snapshot = load_snapshot(&fixture_path("arm_v1.snapshot.json")).unwrap();

    let violations = engine.evaluate(&snapshot.parameter_set()).unwrap();
    assert_eq!(violations.len(), 2);

    // Findings come back in rule order, weight first.
    assert_eq!(violations[0].rule_id, "max_weight_drone");
    assert_eq!(violations[0].current, ParamValue::Number(520.0));
    assert_eq!(violations[0].required, "<= 500");

    assert_eq!(violations[1].rule_id, "min_fillet_cnc");
    assert_eq!(violations[1].current, ParamValue::Number(1.0));
    assert_eq!(violations[1].required, ">= 2");
}

#[test]
fn test_default_rules_also_flag_unit_system() {
    let engine = RuleEngine::with_default_rules();
    let snapshot = load_snapshot(&fixture_path("arm_v1.snapshot.json")).unwrap();

    let violations = engine.evaluate(&snapshot.parameter_set()).unwrap();
    // Weight, fillet, and the IPS unit system.
    assert_eq!(violations.len(), 3);
    assert!(violations.iter().any(|v| v.rule_id == "unit_system_mmgs"));
}

#[test]
fn test_rules_about_absent_parameters_do_not_fire() {
    let json = r#"[
        {"id": "fea_stress", "parameter": "max_stress_mpa", "max_value": 250.0,
         "message": "Stress above yield margin"}
    ]"#;
    let engine = RuleEngine::from_json_str(json).unwrap();
    let snapshot = load_snapshot(&fixture_path("arm_v1.snapshot.json")).unwrap();

    // No FEA data in the snapshot, so the rule is skipped.
    let violations = engine.evaluate(&snapshot.parameter_set()).unwrap();
    assert!(violations.is_empty());
}

#[test]
fn test_violations_serialize_with_stable_field_names() {
    let engine = RuleEngine::load_rules_file(&fixture_path("custom_rules.json")).unwrap();
    let snapshot = load_snapshot(&fixture_path("arm_v1.snapshot.json")).unwrap();

    let violations = engine.evaluate(&snapshot.parameter_set()).unwrap();
    let json = serde_json::to_value(&violations[0]).unwrap();

    assert_eq!(json["rule_id"], "max_weight_drone");
    assert_eq!(json["current"], 520.0);
    assert_eq!(json["required"], "<= 500");
    assert!(json["message"].is_string());
}
