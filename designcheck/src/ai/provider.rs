//! Common interface for suggestion providers.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::ai::AdvisorError;
use crate::estimator::ImpactEstimate;
use crate::rules::Violation;
use crate::schema::{CadSnapshot, DesignIntent, ParamValue};

/// Everything a provider may reason over for one analysis.
///
/// Deterministic findings arrive pre-computed; a provider may add its own
/// observations on top but never removes the rule engine's.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisRequest {
    /// Requirements context. Opaque to the pipeline, prompt material only.
    pub intent: DesignIntent,
    /// Snapshot under analysis.
    pub snapshot: CadSnapshot,
    /// Violations already found by the rule engine.
    pub violations: Vec<Violation>,
    /// Recent accepted-decision lines, or the no-lessons placeholder.
    pub lessons: Vec<String>,
    /// Cost and carbon figures, when the material was known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact: Option<ImpactEstimate>,
}

/// Provider output: remediation advice plus the provider's own risk view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Synthesis {
    /// Provider's risk estimate in [0.0, 1.0].
    pub risk_score: f64,
    /// Additional findings from the provider itself. Empty for the
    /// table-driven backend.
    #[serde(default)]
    pub violations: Vec<Violation>,
    /// Parameter changes that would resolve the findings.
    #[serde(default)]
    pub suggested_parameter_updates: BTreeMap<String, ParamValue>,
    /// Reasoning text surfaced to the reviewer.
    #[serde(default)]
    pub explanation: String,
}

/// Common trait for suggestion providers.
#[async_trait]
pub trait SuggestionProvider: Send + Sync {
    /// Provider name for logs.
    fn name(&self) -> &str;

    /// Whether the provider can currently serve requests.
    async fn is_available(&self) -> bool;

    /// Produce remediation advice for one analysis.
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Synthesis, AdvisorError>;
}
