//! Persistence seams for intents and feedback.
//!
//! The pipeline talks to [`IntentStore`] and [`FeedbackLog`]; a deployment
//! picks a backing implementation for each. [`file`] holds the durable
//! JSON-backed stores, [`memory`] the in-process ones used by tests and
//! default pipelines.

use thiserror::Error;

use crate::feedback::FeedbackRecord;
use crate::schema::DesignIntent;

pub mod file;
pub mod memory;

pub use file::{JsonFileIntentStore, JsonlFeedbackLog};
pub use memory::{MemoryFeedbackLog, MemoryIntentStore};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Lock error: {0}")]
    Lock(String),
}

/// Keyed store for design intents.
pub trait IntentStore: Send + Sync {
    /// Insert or replace the intent under its `design_id`.
    fn put(&self, intent: &DesignIntent) -> Result<(), StorageError>;

    /// Fetch an intent by design id.
    fn get(&self, design_id: &str) -> Result<Option<DesignIntent>, StorageError>;
}

/// Append-only log of reviewer decisions.
///
/// Appends are whole-record: a concurrent reader observes either the log
/// before an append or the log including the complete new entry, never a
/// torn one.
pub trait FeedbackLog: Send + Sync {
    /// Append one record and return its zero-based position in the log.
    fn append(&self, record: &FeedbackRecord) -> Result<u64, StorageError>;

    /// Read every readable record in log order. Damaged entries are
    /// dropped, not fatal.
    fn scan_all(&self) -> Result<Vec<FeedbackRecord>, StorageError>;

    /// Last `limit` records, still in log order.
    fn scan_tail(&self, limit: usize) -> Result<Vec<FeedbackRecord>, StorageError> {
        let mut records = self.scan_all()?;
        if records.len() > limit {
            records.drain(..records.len() - limit);
        }
        Ok(records)
    }
}
