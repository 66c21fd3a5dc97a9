//! Embedded default rule set.
//!
//! The default rules compile into the binary so the analyzer works with no
//! configuration; deployments override them with
//! [`RuleEngine::load_rules_file`](super::RuleEngine::load_rules_file).

use super::engine::Rule;

const EMBEDDED_RULES: &str = include_str!("../../data/rules.json");

/// Default rule set parsed from the embedded JSON.
pub fn default_rules() -> Vec<Rule> {
    match serde_json::from_str::<Vec<Rule>>(EMBEDDED_RULES) {
        Ok(rules) => rules,
        Err(e) => {
            tracing::warn!("Failed to parse embedded rules: {}", e);
            Vec::new()
        }
    }
}
