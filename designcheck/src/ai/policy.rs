//! Table-driven suggestion synthesis.
//!
//! Maps each known rule id to a fixed parameter adjustment and an
//! explanation fragment. The same violations always produce the same words,
//! which keeps the default pipeline reproducible end to end.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::ai::provider::{SuggestionProvider, Synthesis, SynthesisRequest};
use crate::ai::AdvisorError;
use crate::history::NO_LESSONS;
use crate::rules::Violation;
use crate::schema::ParamValue;

/// Risk reported when at least one violation is present.
const RISK_WITH_VIOLATIONS: f64 = 0.8;
/// Risk reported for a clean parameter set.
const RISK_CLEAN: f64 = 0.1;

/// Deterministic suggestion backend driven by a rule-id policy table.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyAdvisor;

impl PolicyAdvisor {
    pub fn new() -> Self {
        PolicyAdvisor
    }

    /// Remediation policy for one rule id: parameter updates plus an
    /// explanation fragment. Unknown ids have no policy.
    fn policy(rule_id: &str) -> Option<(Vec<(&'static str, ParamValue)>, &'static str)> {
        match rule_id {
            "max_weight_drone" => Some((
                vec![("wall_thickness_mm", ParamValue::Number(2.5))],
                "reduce wall thickness to 2.5 mm to bring the part under its weight budget",
            )),
            "min_fillet_cnc" => Some((
                vec![("fillet_radius_mm", ParamValue::Number(2.5))],
                "increase the fillet radius to 2.5 mm to meet the CNC tooling minimum",
            )),
            "unit_system_mmgs" => Some((
                vec![("unit_system", ParamValue::Text("MMGS".to_string()))],
                "switch the document unit system to MMGS before manufacturing handoff",
            )),
            _ => None,
        }
    }

    /// Pure synthesis over violations and lesson lines.
    pub fn synthesize_deterministic(violations: &[Violation], lessons: &[String]) -> Synthesis {
        let mut updates = BTreeMap::new();
        let mut fragments: Vec<&'static str> = Vec::new();

        for violation in violations {
            if let Some((params, fragment)) = Self::policy(&violation.rule_id) {
                for (name, value) in params {
                    updates.insert(name.to_string(), value);
                }
                if !fragments.contains(&fragment) {
                    fragments.push(fragment);
                }
            }
        }

        let mut explanation = if violations.is_empty() {
            "Design parameters satisfy all evaluated rules.".to_string()
        } else if fragments.is_empty() {
            "No stored remediation applies to the detected violations; manual review required."
                .to_string()
        } else {
            format!("Recommended remediation: {}.", fragments.join("; "))
        };

        if lessons.iter().any(|lesson| lesson != NO_LESSONS) {
            explanation.push_str(" Reviewers accepted similar remediations on earlier designs.");
        }

        Synthesis {
            risk_score: if violations.is_empty() {
                RISK_CLEAN
            } else {
                RISK_WITH_VIOLATIONS
            },
            violations: Vec::new(),
            suggested_parameter_updates: updates,
            explanation,
        }
    }
}

#[async_trait]
impl SuggestionProvider for PolicyAdvisor {
    fn name(&self) -> &str {
        "policy"
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Synthesis, AdvisorError> {
        Ok(Self::synthesize_deterministic(
            &request.violations,
            &request.lessons,
        ))
    }
}
