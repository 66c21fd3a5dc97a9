//! Declarative rule store and evaluation.

pub mod builtin;
pub mod engine;

pub use engine::{Rule, RuleEngine, RuleError, Violation};
