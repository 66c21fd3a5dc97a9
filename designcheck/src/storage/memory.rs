//! In-memory stores for tests and default pipelines.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::feedback::FeedbackRecord;
use crate::schema::DesignIntent;
use crate::storage::{FeedbackLog, IntentStore, StorageError};

/// Intent store held in a process-local map.
#[derive(Default)]
pub struct MemoryIntentStore {
    intents: Mutex<HashMap<String, DesignIntent>>,
}

impl MemoryIntentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IntentStore for MemoryIntentStore {
    fn put(&self, intent: &DesignIntent) -> Result<(), StorageError> {
        let mut intents = self
            .intents
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        intents.insert(intent.design_id.clone(), intent.clone());
        Ok(())
    }

    fn get(&self, design_id: &str) -> Result<Option<DesignIntent>, StorageError> {
        let intents = self
            .intents
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        Ok(intents.get(design_id).cloned())
    }
}

/// Feedback log held in a process-local vector.
#[derive(Default)]
pub struct MemoryFeedbackLog {
    records: Mutex<Vec<FeedbackRecord>>,
}

impl MemoryFeedbackLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FeedbackLog for MemoryFeedbackLog {
    fn append(&self, record: &FeedbackRecord) -> Result<u64, StorageError> {
        let mut records = self
            .records
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        records.push(record.clone());
        Ok((records.len() - 1) as u64)
    }

    fn scan_all(&self) -> Result<Vec<FeedbackRecord>, StorageError> {
        let records = self
            .records
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        Ok(records.clone())
    }
}
