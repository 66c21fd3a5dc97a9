//! Reviewer feedback capture.
//!
//! Every accept/reject/modify decision a reviewer makes about an analysis
//! is appended to a log and never rewritten. The log is the pipeline's
//! institutional memory: accepted decisions resurface as lessons in later
//! analyses (see [`crate::history`]).

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::{FeedbackLog, StorageError};

/// Reviewer verdict on an analysis result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Accepted,
    Rejected,
    Modified,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Decision::Accepted => "accepted",
            Decision::Rejected => "rejected",
            Decision::Modified => "modified",
        };
        f.write_str(s)
    }
}

/// One reviewer decision about one analysis.
///
/// Record identity is positional: log order is decision order. The
/// `recorded_at` stamp is audit metadata and never used for ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    /// Analysis the decision refers to.
    pub analysis_id: String,
    pub decision: Decision,
    /// Free-form reviewer comment; this is the text that becomes a lesson.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    /// Wall-clock stamp applied at record time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,
}

impl FeedbackRecord {
    pub fn new(analysis_id: impl Into<String>, decision: Decision) -> Self {
        FeedbackRecord {
            analysis_id: analysis_id.into(),
            decision,
            comments: None,
            recorded_at: None,
        }
    }

    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = Some(comments.into());
        self
    }
}

/// Acknowledgement returned after a successful append.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackAck {
    pub status: String,
    /// Zero-based position of the record in the log.
    pub position: u64,
}

/// Appends reviewer decisions to a shared feedback log.
pub struct FeedbackRecorder {
    log: Arc<dyn FeedbackLog>,
}

impl FeedbackRecorder {
    pub fn new(log: Arc<dyn FeedbackLog>) -> Self {
        FeedbackRecorder { log }
    }

    /// Append one record. Prior entries are never touched; a storage
    /// failure is surfaced to the caller, not retried.
    pub fn record(&self, mut record: FeedbackRecord) -> Result<FeedbackAck, StorageError> {
        if record.recorded_at.is_none() {
            record.recorded_at = Some(Utc::now());
        }
        let position = self.log.append(&record)?;
        tracing::info!(
            "Recorded {} feedback for analysis {} at position {}",
            record.decision,
            record.analysis_id,
            position
        );
        Ok(FeedbackAck {
            status: "recorded".to_string(),
            position,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryFeedbackLog;

    #[test]
    fn test_decision_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Decision::Accepted).unwrap(), "\"accepted\"");
        assert_eq!(serde_json::to_string(&Decision::Rejected).unwrap(), "\"rejected\"");
        assert_eq!(serde_json::to_string(&Decision::Modified).unwrap(), "\"modified\"");

        let back: Decision = serde_json::from_str("\"modified\"").unwrap();
        assert_eq!(back, Decision::Modified);
    }

    #[test]
    fn test_record_stamps_time_and_acks_position() {
        let log = Arc::new(MemoryFeedbackLog::new());
        let recorder = FeedbackRecorder::new(log.clone());

        let ack = recorder
            .record(FeedbackRecord::new("a-1", Decision::Accepted))
            .unwrap();
        assert_eq!(ack.status, "recorded");
        assert_eq!(ack.position, 0);

        let ack = recorder
            .record(FeedbackRecord::new("a-1", Decision::Rejected))
            .unwrap();
        assert_eq!(ack.position, 1);

        let records = log.scan_all().unwrap();
        assert!(records[0].recorded_at.is_some());
    }

    #[test]
    fn test_record_keeps_caller_timestamp() {
        let log = Arc::new(MemoryFeedbackLog::new());
        let recorder = FeedbackRecorder::new(log.clone());

        let stamp: DateTime<Utc> = "2025-03-01T12:00:00Z".parse().unwrap();
        let mut record = FeedbackRecord::new("a-2", Decision::Modified);
        record.recorded_at = Some(stamp);
        recorder.record(record).unwrap();

        assert_eq!(log.scan_all().unwrap()[0].recorded_at, Some(stamp));
    }

    #[test]
    fn test_optional_fields_stay_out_of_json() {
        let record = FeedbackRecord::new("a-3", Decision::Accepted);
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("comments"));
        assert!(!json.contains("recorded_at"));
    }
}
