//! Analysis orchestration shared by library callers and the CLI.
//!
//! One `analyze` call runs the fixed sequence flatten, evaluate rules,
//! retrieve lessons, estimate impact, synthesize remediation, assemble the
//! verdict. The default pipeline is fully deterministic: repeated calls on
//! the same inputs serialize byte-identically.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ai::{PolicyAdvisor, SuggestionProvider, Synthesis, SynthesisRequest};
use crate::estimator::{estimate_impact, ImpactConfig, ImpactEstimate};
use crate::feedback::{FeedbackAck, FeedbackRecord, FeedbackRecorder};
use crate::history::{retrieve_recent_lessons, DEFAULT_LESSON_LIMIT};
use crate::materials::MaterialRegistry;
use crate::rules::{RuleEngine, RuleError, Violation};
use crate::schema::{CadSnapshot, DesignIntent, ParamValue};
use crate::storage::{FeedbackLog, MemoryFeedbackLog, StorageError};

/// Risk reported whenever the rule engine found anything. Deterministic
/// findings dominate whatever score the synthesis backend proposed.
const RISK_RULE_FINDINGS: f64 = 0.9;

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Rule evaluation failed: {0}")]
    Rule(#[from] RuleError),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Options for analysis runs.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    pub impact: ImpactConfig,
    /// How many recent accepted decisions feed into synthesis.
    pub lesson_limit: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        AnalysisOptions {
            impact: ImpactConfig::default(),
            lesson_limit: DEFAULT_LESSON_LIMIT,
        }
    }
}

/// Final verdict for one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// True exactly when `violations` is empty.
    pub compliance: bool,
    /// Risk in [0.0, 1.0].
    pub risk_score: f64,
    /// USD figure, absent when the material was unknown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<f64>,
    /// kg CO2e figure, absent when the material was unknown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbon_footprint_kg: Option<f64>,
    /// Rule engine findings first, then any provider findings.
    pub violations: Vec<Violation>,
    /// Parameter changes that would resolve the findings.
    pub suggested_parameter_updates: BTreeMap<String, ParamValue>,
    /// Violation count preamble followed by the synthesized reasoning.
    pub explanation: String,
}

/// Orchestrates one full analysis pass.
pub struct AnalysisPipeline {
    engine: RuleEngine,
    materials: MaterialRegistry,
    feedback_log: Arc<dyn FeedbackLog>,
    options: AnalysisOptions,
}

impl AnalysisPipeline {
    pub fn new(
        engine: RuleEngine,
        materials: MaterialRegistry,
        feedback_log: Arc<dyn FeedbackLog>,
    ) -> Self {
        AnalysisPipeline {
            engine,
            materials,
            feedback_log,
            options: AnalysisOptions::default(),
        }
    }

    /// Embedded rules and materials with an in-memory feedback log.
    pub fn with_defaults() -> Self {
        AnalysisPipeline::new(
            RuleEngine::with_default_rules(),
            MaterialRegistry::with_default_materials(),
            Arc::new(MemoryFeedbackLog::new()),
        )
    }

    pub fn with_options(mut self, options: AnalysisOptions) -> Self {
        self.options = options;
        self
    }

    /// Run the deterministic pipeline with the table-driven synthesizer.
    pub fn analyze(
        &self,
        intent: &DesignIntent,
        snapshot: &CadSnapshot,
    ) -> Result<AnalysisResult, AnalysisError> {
        tracing::debug!(
            "Analyzing snapshot against intent {} with {} rules",
            intent.design_id,
            self.engine.rules().len()
        );

        let (violations, lessons, impact) = self.gather(snapshot)?;
        let synthesis = PolicyAdvisor::synthesize_deterministic(&violations, &lessons);
        Ok(assemble(violations, impact, synthesis))
    }

    /// Variant with an injected reasoning backend. A provider failure
    /// degrades to the deterministic synthesis instead of failing the run,
    /// so the result is still complete, just less tailored.
    pub async fn analyze_with(
        &self,
        provider: &dyn SuggestionProvider,
        intent: &DesignIntent,
        snapshot: &CadSnapshot,
    ) -> Result<AnalysisResult, AnalysisError> {
        let (violations, lessons, impact) = self.gather(snapshot)?;

        let request = SynthesisRequest {
            intent: intent.clone(),
            snapshot: snapshot.clone(),
            violations: violations.clone(),
            lessons: lessons.clone(),
            impact,
        };

        let synthesis = match provider.synthesize(&request).await {
            Ok(synthesis) => synthesis,
            Err(e) => {
                tracing::warn!(
                    "Provider '{}' failed, falling back to deterministic synthesis: {}",
                    provider.name(),
                    e
                );
                PolicyAdvisor::synthesize_deterministic(&violations, &lessons)
            }
        };

        Ok(assemble(violations, impact, synthesis))
    }

    /// Record a reviewer decision about a prior analysis. Appends only;
    /// storage failures surface to the caller and never touch prior entries.
    pub fn record_feedback(&self, record: FeedbackRecord) -> Result<FeedbackAck, StorageError> {
        FeedbackRecorder::new(Arc::clone(&self.feedback_log)).record(record)
    }

    /// Recent accepted-decision lessons as currently visible to analyses.
    pub fn recent_lessons(&self) -> Vec<String> {
        retrieve_recent_lessons(self.feedback_log.as_ref(), self.options.lesson_limit)
    }

    fn gather(
        &self,
        snapshot: &CadSnapshot,
    ) -> Result<(Vec<Violation>, Vec<String>, Option<ImpactEstimate>), AnalysisError> {
        let parameters = snapshot.parameter_set();
        let violations = self.engine.evaluate(&parameters)?;
        let lessons =
            retrieve_recent_lessons(self.feedback_log.as_ref(), self.options.lesson_limit);
        let impact = match (snapshot.material(), snapshot.volume_mm3()) {
            (Some(material), Some(volume)) => {
                estimate_impact(&self.materials, material, volume, &self.options.impact)
            }
            _ => None,
        };
        Ok((violations, lessons, impact))
    }
}

/// Merge deterministic findings with the synthesis. Rule engine violations
/// come first in the merged list and force the risk score when present.
fn assemble(
    deterministic: Vec<Violation>,
    impact: Option<ImpactEstimate>,
    synthesis: Synthesis,
) -> AnalysisResult {
    let deterministic_count = deterministic.len();

    let mut violations = deterministic;
    violations.extend(synthesis.violations);

    let risk_score = if deterministic_count > 0 {
        RISK_RULE_FINDINGS
    } else {
        synthesis.risk_score
    };

    let preamble = match deterministic_count {
        0 => "No rule violations detected.".to_string(),
        1 => "1 rule violation detected.".to_string(),
        n => format!("{} rule violations detected.", n),
    };
    let explanation = if synthesis.explanation.is_empty() {
        preamble
    } else {
        format!("{} {}", preamble, synthesis.explanation)
    };

    AnalysisResult {
        compliance: violations.is_empty(),
        risk_score,
        estimated_cost: impact.map(|i| i.cost_usd),
        carbon_footprint_kg: impact.map(|i| i.carbon_kg),
        violations,
        suggested_parameter_updates: synthesis.suggested_parameter_updates,
        explanation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(rule_id: &str) -> Violation {
        Violation {
            rule_id: rule_id.to_string(),
            message: "m".to_string(),
            current: ParamValue::Number(1.0),
            required: ">= 2".to_string(),
        }
    }

    fn synthesis(risk: f64, explanation: &str) -> Synthesis {
        Synthesis {
            risk_score: risk,
            violations: Vec::new(),
            suggested_parameter_updates: BTreeMap::new(),
            explanation: explanation.to_string(),
        }
    }

    #[test]
    fn test_assemble_forces_risk_on_findings() {
        let result = assemble(vec![finding("a")], None, synthesis(0.2, "text"));
        assert_eq!(result.risk_score, 0.9);
        assert!(!result.compliance);
    }

    #[test]
    fn test_assemble_keeps_synthesis_risk_when_clean() {
        let result = assemble(Vec::new(), None, synthesis(0.1, "text"));
        assert_eq!(result.risk_score, 0.1);
        assert!(result.compliance);
    }

    #[test]
    fn test_assemble_preamble_counts() {
        let result = assemble(Vec::new(), None, synthesis(0.1, "All good."));
        assert_eq!(result.explanation, "No rule violations detected. All good.");

        let result = assemble(vec![finding("a")], None, synthesis(0.8, "Fix it."));
        assert_eq!(result.explanation, "1 rule violation detected. Fix it.");

        let result = assemble(
            vec![finding("a"), finding("b")],
            None,
            synthesis(0.8, "Fix both."),
        );
        assert_eq!(result.explanation, "2 rule violations detected. Fix both.");
    }

    #[test]
    fn test_assemble_merges_provider_findings_after_deterministic() {
        let mut extra = synthesis(0.5, "");
        extra.violations.push(finding("provider_extra"));

        let result = assemble(vec![finding("rule_a")], None, extra);
        let ids: Vec<&str> = result.violations.iter().map(|v| v.rule_id.as_str()).collect();
        assert_eq!(ids, vec!["rule_a", "provider_extra"]);
        // Deterministic findings still control the score.
        assert_eq!(result.risk_score, 0.9);
    }

    #[test]
    fn test_assemble_provider_findings_alone_break_compliance() {
        let mut extra = synthesis(0.42, "Provider concern.");
        extra.violations.push(finding("provider_extra"));

        let result = assemble(Vec::new(), None, extra);
        assert!(!result.compliance);
        // No deterministic findings, so the provider risk stands.
        assert_eq!(result.risk_score, 0.42);
        assert!(result.explanation.starts_with("No rule violations detected."));
    }

    #[test]
    fn test_assemble_carries_impact() {
        let impact = ImpactEstimate {
            cost_usd: 6.01,
            carbon_kg: 4.27,
        };
        let result = assemble(Vec::new(), Some(impact), synthesis(0.1, ""));
        assert_eq!(result.estimated_cost, Some(6.01));
        assert_eq!(result.carbon_footprint_kg, Some(4.27));

        let result = assemble(Vec::new(), None, synthesis(0.1, ""));
        assert_eq!(result.estimated_cost, None);
        assert_eq!(result.carbon_footprint_kg, None);
    }
}
