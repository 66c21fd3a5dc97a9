//! File-backed stores: a JSON map for intents, JSON Lines for feedback.

use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::feedback::FeedbackRecord;
use crate::schema::DesignIntent;
use crate::storage::{FeedbackLog, IntentStore, StorageError};

/// Intent store backed by one JSON file holding an id-to-intent map.
///
/// Writes rewrite the whole file through a temp-file rename, so a crashed
/// write never leaves a half-written store behind.
pub struct JsonFileIntentStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileIntentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileIntentStore {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, DesignIntent>, StorageError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }
}

impl IntentStore for JsonFileIntentStore {
    fn put(&self, intent: &DesignIntent) -> Result<(), StorageError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;

        let mut map = self.read_map()?;
        map.insert(intent.design_id.clone(), intent.clone());

        let json = serde_json::to_string_pretty(&map)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn get(&self, design_id: &str) -> Result<Option<DesignIntent>, StorageError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        Ok(self.read_map()?.remove(design_id))
    }
}

/// Append-only feedback log: one JSON object per line.
///
/// Each append writes one complete line through a single `write_all` while
/// holding the mutex, so scans see whole records only. Existing lines are
/// never rewritten.
pub struct JsonlFeedbackLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonlFeedbackLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonlFeedbackLog {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FeedbackLog for JsonlFeedbackLog {
    fn append(&self, record: &FeedbackRecord) -> Result<u64, StorageError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;

        // Position comes from a line count under the lock; the log stays
        // small enough (one line per reviewer decision) that this is fine.
        let position = count_lines(&self.path)?;

        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;

        Ok(position)
    }

    fn scan_all(&self) -> Result<Vec<FeedbackRecord>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut records = Vec::new();

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<FeedbackRecord>(&line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!("Skipping damaged feedback entry: {}", e);
                }
            }
        }

        Ok(records)
    }
}

fn count_lines(path: &Path) -> Result<u64, StorageError> {
    if !path.exists() {
        return Ok(0);
    }
    let file = File::open(path)?;
    Ok(BufReader::new(file).lines().count() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::Decision;
    use tempfile::TempDir;

    fn record(comment: &str) -> FeedbackRecord {
        FeedbackRecord::new("a-1", Decision::Accepted).with_comments(comment)
    }

    #[test]
    fn test_jsonl_append_and_scan() {
        let temp = TempDir::new().unwrap();
        let log = JsonlFeedbackLog::new(temp.path().join("feedback.jsonl"));

        assert_eq!(log.append(&record("first")).unwrap(), 0);
        assert_eq!(log.append(&record("second")).unwrap(), 1);

        let records = log.scan_all().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].comments.as_deref(), Some("first"));
        assert_eq!(records[1].comments.as_deref(), Some("second"));
    }

    #[test]
    fn test_jsonl_scan_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let log = JsonlFeedbackLog::new(temp.path().join("missing.jsonl"));
        assert!(log.scan_all().unwrap().is_empty());
    }

    #[test]
    fn test_jsonl_damaged_line_is_skipped() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("feedback.jsonl");
        let log = JsonlFeedbackLog::new(&path);

        log.append(&record("kept")).unwrap();
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        file.write_all(b"{ not json\n").unwrap();
        log.append(&record("also kept")).unwrap();

        let records = log.scan_all().unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_jsonl_append_preserves_prior_bytes() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("feedback.jsonl");
        let log = JsonlFeedbackLog::new(&path);

        log.append(&record("first")).unwrap();
        let before = std::fs::read_to_string(&path).unwrap();
        log.append(&record("second")).unwrap();
        let after = std::fs::read_to_string(&path).unwrap();

        assert!(after.starts_with(&before));
    }

    #[test]
    fn test_intent_store_put_get() {
        let temp = TempDir::new().unwrap();
        let store = JsonFileIntentStore::new(temp.path().join("intents.json"));

        let intent = DesignIntent::new("drone_arm");
        store.put(&intent).unwrap();

        let loaded = store.get(&intent.design_id).unwrap().unwrap();
        assert_eq!(loaded, intent);
        assert!(store.get("nope").unwrap().is_none());
    }

    #[test]
    fn test_intent_store_replaces_and_stays_valid_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("intents.json");
        let store = JsonFileIntentStore::new(&path);

        let mut intent = DesignIntent::new("drone_arm");
        store.put(&intent).unwrap();
        intent.version = "2.0".to_string();
        store.put(&intent).unwrap();

        let loaded = store.get(&intent.design_id).unwrap().unwrap();
        assert_eq!(loaded.version, "2.0");

        let raw = std::fs::read_to_string(&path).unwrap();
        let map: BTreeMap<String, DesignIntent> = serde_json::from_str(&raw).unwrap();
        assert_eq!(map.len(), 1);
    }
}
