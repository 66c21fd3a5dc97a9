//! Lesson retrieval from the feedback log.
//!
//! Only accepted decisions come back: an accepted analysis is a precedent,
//! a rejected one is noise for future suggestions. Retrieval is read-only
//! and tolerates a damaged or absent log.

use crate::feedback::Decision;
use crate::storage::FeedbackLog;

/// Placeholder lesson used when the log holds no accepted decisions, so
/// downstream prompt assembly always has a non-empty lessons block.
pub const NO_LESSONS: &str = "No relevant lessons recorded.";

/// How many lessons feed into synthesis by default.
pub const DEFAULT_LESSON_LIMIT: usize = 5;

/// Collect recent accepted decisions as one formatted line each, oldest
/// first, capped at `limit`. A log that cannot be read at all degrades to
/// the placeholder; analysis never fails because history is missing.
pub fn retrieve_recent_lessons(log: &dyn FeedbackLog, limit: usize) -> Vec<String> {
    let records = match log.scan_all() {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!("Feedback log unreadable, continuing without lessons: {}", e);
            return vec![NO_LESSONS.to_string()];
        }
    };

    let mut lessons: Vec<String> = records
        .iter()
        .filter(|record| record.decision == Decision::Accepted)
        .map(|record| match &record.comments {
            Some(comments) => format!("- Accepted decision: {}", comments),
            None => "- Accepted decision: (no comment)".to_string(),
        })
        .collect();

    if lessons.is_empty() {
        return vec![NO_LESSONS.to_string()];
    }

    if lessons.len() > limit {
        lessons.drain(..lessons.len() - limit);
    }
    lessons
}
