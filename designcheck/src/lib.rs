//! DesignCheck - design compliance analysis for CAD snapshots
//!
//! This library evaluates a CAD design snapshot (named parameters, mass
//! properties, document settings) against a declarative rule set, estimates
//! cost and carbon impact from a material library, folds in previously
//! accepted reviewer decisions, and synthesizes a remediation explanation.
//!
//! # Quick Start
//!
//! ```
//! use designcheck::{AnalysisPipeline, CadSnapshot, DesignIntent};
//!
//! let pipeline = AnalysisPipeline::with_defaults();
//! let intent = DesignIntent::new("drone_arm");
//! let snapshot = CadSnapshot::sample_drone_arm();
//!
//! let result = pipeline.analyze(&intent, &snapshot).unwrap();
//! for violation in &result.violations {
//!     println!("{}: {}", violation.rule_id, violation.message);
//! }
//! ```
//!
//! # Features
//!
//! - **Rule evaluation**: declarative min/max/allowed-value rules over a
//!   flattened parameter set
//! - **Impact estimation**: cost and CO2 figures from a material library
//! - **Feedback loop**: append-only reviewer decision log feeding recent
//!   lessons back into suggestions
//! - **Pluggable reasoning**: deterministic policy table by default, HTTP
//!   backend optional (used by CLI integrations)

pub mod ai;
pub mod core;
pub mod estimator;
pub mod feedback;
pub mod history;
pub mod materials;
pub mod rules;
pub mod schema;
pub mod storage;

// Re-export main types
pub use crate::core::{
    AnalysisError, AnalysisOptions, AnalysisPipeline, AnalysisResult,
};
pub use crate::ai::{
    AdvisorError, PolicyAdvisor, RemoteAdvisor, SuggestionProvider, Synthesis, SynthesisRequest,
};
pub use crate::estimator::{estimate_impact, ImpactConfig, ImpactEstimate};
pub use crate::feedback::{Decision, FeedbackAck, FeedbackRecord, FeedbackRecorder};
pub use crate::history::{retrieve_recent_lessons, DEFAULT_LESSON_LIMIT, NO_LESSONS};
pub use crate::materials::{MaterialProperties, MaterialRegistry};
pub use crate::rules::{Rule, RuleEngine, RuleError, Violation};
pub use crate::schema::{CadSnapshot, DesignIntent, DocumentSettings, ParamValue, ParameterSet};
pub use crate::storage::{
    FeedbackLog, IntentStore, JsonFileIntentStore, JsonlFeedbackLog, MemoryFeedbackLog,
    MemoryIntentStore, StorageError,
};

/// Load a CAD snapshot from a JSON file (convenience wrapper).
pub fn load_snapshot(path: &std::path::Path) -> Result<CadSnapshot, AnalysisError> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| AnalysisError::Parse(e.to_string()))
}

/// Load a design intent from a JSON file (convenience wrapper).
pub fn load_intent(path: &std::path::Path) -> Result<DesignIntent, AnalysisError> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| AnalysisError::Parse(e.to_string()))
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        AnalysisError, AnalysisOptions, AnalysisPipeline, AnalysisResult, CadSnapshot, Decision,
        DesignIntent, FeedbackRecord, ParamValue, ParameterSet, Rule, RuleEngine, RuleError,
        Violation,
    };
}
