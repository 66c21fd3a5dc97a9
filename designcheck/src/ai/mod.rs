//! Suggestion synthesis: the pluggable reasoning seam.
//!
//! The orchestrator only knows the [`SuggestionProvider`] trait.
//! [`PolicyAdvisor`] is the default deterministic backend; [`RemoteAdvisor`]
//! posts the assembled context to an HTTP reasoning service. Swapping one
//! for the other changes the words in a result, never the rule findings.

pub mod policy;
pub mod prompts;
pub mod provider;
pub mod remote;

// Re-export for convenience
pub use policy::PolicyAdvisor;
pub use prompts::build_analysis_prompt;
pub use provider::{SuggestionProvider, Synthesis, SynthesisRequest};
pub use remote::RemoteAdvisor;

use thiserror::Error;

/// Errors from suggestion providers. Never fatal to an analysis: the
/// orchestrator falls back to the deterministic backend.
#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("Reasoning service error: {status} - {message}")]
    ApiError { status: u16, message: String },
    #[error("Failed to parse provider response: {0}")]
    ParseError(String),
    #[error("No reasoning backend available")]
    Unavailable,
}
