//! Declarative rule evaluation.
//!
//! Rules are data, not code: each rule names one parameter and carries
//! optional numeric bounds and/or an allowed-value set. Teams ship rule
//! sets as JSON files and load them at runtime, so adding a constraint
//! never requires a recompile.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::schema::{ParamValue, ParameterSet};

use super::builtin;

/// Declarative constraint on one named parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Unique rule identifier, e.g. "max_weight_drone".
    pub id: String,
    /// Parameter the rule applies to.
    pub parameter: String,
    /// Inclusive lower bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    /// Inclusive upper bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
    /// Exact-match whitelist. Values compare without coercion, so a numeric
    /// parameter never matches a text entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<ParamValue>>,
    /// Message reported when the rule is violated.
    pub message: String,
}

/// One failed constraint check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Rule that produced this finding.
    pub rule_id: String,
    /// Human-readable description from the rule definition.
    pub message: String,
    /// Value the snapshot actually carried.
    pub current: ParamValue,
    /// Constraint that was not met, e.g. "<= 500".
    pub required: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// A numeric bound was applied to a non-numeric parameter. This is a
    /// rule-set authoring mistake, so evaluation stops instead of guessing.
    #[error("rule '{rule_id}': numeric bound on non-numeric parameter '{parameter}'")]
    TypeMismatch { rule_id: String, parameter: String },
    #[error("invalid rule set: {0}")]
    InvalidRules(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Ordered rule store plus the evaluation pass over it.
#[derive(Debug)]
pub struct RuleEngine {
    rules: Vec<Rule>,
}

impl RuleEngine {
    pub fn new(rules: Vec<Rule>) -> Self {
        RuleEngine { rules }
    }

    /// Engine preloaded with the embedded default rule set.
    pub fn with_default_rules() -> Self {
        RuleEngine::new(builtin::default_rules())
    }

    /// Parse a rule set from a JSON array of rule objects.
    pub fn from_json_str(json: &str) -> Result<Self, RuleError> {
        let rules: Vec<Rule> =
            serde_json::from_str(json).map_err(|e| RuleError::InvalidRules(e.to_string()))?;
        Ok(RuleEngine::new(rules))
    }

    /// Load a rule set from a JSON file.
    pub fn load_rules_file(path: &Path) -> Result<Self, RuleError> {
        let content = std::fs::read_to_string(path)?;
        let engine = RuleEngine::from_json_str(&content)?;
        tracing::info!("Loaded {} rules from {:?}", engine.rules.len(), path);
        Ok(engine)
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Evaluate a parameter set against the store.
    ///
    /// Rules run in store order. Within a rule the constraints run in the
    /// fixed order allowed values, minimum, maximum, and each present
    /// constraint is checked independently, so one rule can report several
    /// violations. A rule naming a parameter the set does not contain is
    /// skipped: absent data is not non-compliance.
    pub fn evaluate(&self, parameters: &ParameterSet) -> Result<Vec<Violation>, RuleError> {
        let mut violations = Vec::new();

        for rule in &self.rules {
            let value = match parameters.get(&rule.parameter) {
                Some(value) => value,
                None => continue,
            };

            if let Some(allowed) = &rule.allowed_values {
                if !allowed.contains(value) {
                    let listing = allowed
                        .iter()
                        .map(|v| v.to_string())
                        .collect::<Vec<_>>()
                        .join(", ");
                    violations.push(Violation {
                        rule_id: rule.id.clone(),
                        message: rule.message.clone(),
                        current: value.clone(),
                        required: format!("one of {{{}}}", listing),
                    });
                }
            }

            if let Some(min) = rule.min_value {
                let number = numeric(rule, value)?;
                if number < min {
                    violations.push(Violation {
                        rule_id: rule.id.clone(),
                        message: rule.message.clone(),
                        current: value.clone(),
                        required: format!(">= {}", min),
                    });
                }
            }

            if let Some(max) = rule.max_value {
                let number = numeric(rule, value)?;
                if number > max {
                    violations.push(Violation {
                        rule_id: rule.id.clone(),
                        message: rule.message.clone(),
                        current: value.clone(),
                        required: format!("<= {}", max),
                    });
                }
            }
        }

        Ok(violations)
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        RuleEngine::with_default_rules()
    }
}

fn numeric(rule: &Rule, value: &ParamValue) -> Result<f64, RuleError> {
    value.as_number().ok_or_else(|| RuleError::TypeMismatch {
        rule_id: rule.id.clone(),
        parameter: rule.parameter.clone(),
    })
}
