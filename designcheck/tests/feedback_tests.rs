//! Feedback log round-trip and durability tests.

use std::io::Write;
use std::sync::Arc;
use std::thread;

use designcheck::{
    retrieve_recent_lessons, Decision, FeedbackLog, FeedbackRecord, FeedbackRecorder,
    JsonlFeedbackLog, NO_LESSONS,
};
use tempfile::TempDir;

fn accepted(comment: &str) -> FeedbackRecord {
    FeedbackRecord::new("analysis-1", Decision::Accepted).with_comments(comment)
}

#[test]
fn test_feedback_round_trip_through_file() {
    let temp = TempDir::new().unwrap();
    let log = Arc::new(JsonlFeedbackLog::new(temp.path().join("feedback.jsonl")));
    let recorder = FeedbackRecorder::new(log.clone());

    let ack = recorder.record(accepted("Accepted thinner walls.")).unwrap();
    assert_eq!(ack.status, "recorded");
    assert_eq!(ack.position, 0);

    let lessons = retrieve_recent_lessons(log.as_ref(), 5);
    assert_eq!(
        lessons,
        vec!["- Accepted decision: Accepted thinner walls.".to_string()]
    );
}

#[test]
fn test_lessons_window_spans_whole_log() {
    let temp = TempDir::new().unwrap();
    let log = JsonlFeedbackLog::new(temp.path().join("feedback.jsonl"));

    // Seven accepted decisions interleaved with rejections.
    for i in 1..=7 {
        log.append(&accepted(&format!("lesson {}", i))).unwrap();
        log.append(&FeedbackRecord::new("analysis-1", Decision::Rejected))
            .unwrap();
    }

    let lessons = retrieve_recent_lessons(&log, 5);
    assert_eq!(lessons.len(), 5);
    // Newest five accepted decisions, oldest first.
    assert_eq!(lessons[0], "- Accepted decision: lesson 3");
    assert_eq!(lessons[4], "- Accepted decision: lesson 7");
}

#[test]
fn test_rejections_never_become_lessons() {
    let temp = TempDir::new().unwrap();
    let log = JsonlFeedbackLog::new(temp.path().join("feedback.jsonl"));

    log.append(&FeedbackRecord::new("analysis-1", Decision::Rejected).with_comments("no"))
        .unwrap();
    log.append(&FeedbackRecord::new("analysis-1", Decision::Modified).with_comments("maybe"))
        .unwrap();

    assert_eq!(retrieve_recent_lessons(&log, 5), vec![NO_LESSONS.to_string()]);
}

#[test]
fn test_damaged_lines_are_dropped_not_fatal() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("feedback.jsonl");
    let log = JsonlFeedbackLog::new(&path);

    log.append(&accepted("good before")).unwrap();
    {
        let mut file = std::fs::OpenOptions::new()
            .append(true)
            .open(&path)
            .unwrap();
        file.write_all(b"%%% truncated garbage\n").unwrap();
    }
    log.append(&accepted("good after")).unwrap();

    let records = log.scan_all().unwrap();
    assert_eq!(records.len(), 2);

    let lessons = retrieve_recent_lessons(&log, 5);
    assert_eq!(lessons.len(), 2);
    assert_eq!(lessons[1], "- Accepted decision: good after");
}

#[test]
fn test_append_never_rewrites_prior_entries() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("feedback.jsonl");
    let log = JsonlFeedbackLog::new(&path);

    log.append(&accepted("first")).unwrap();
    log.append(&accepted("second")).unwrap();
    let before = std::fs::read_to_string(&path).unwrap();

    log.append(&accepted("third")).unwrap();
    let after = std::fs::read_to_string(&path).unwrap();

    assert!(after.starts_with(&before));
    assert_eq!(after.lines().count(), 3);
}

#[test]
fn test_concurrent_appends_produce_whole_lines() {
    let temp = TempDir::new().unwrap();
    let log = Arc::new(JsonlFeedbackLog::new(temp.path().join("feedback.jsonl")));

    let mut handles = Vec::new();
    for t in 0..8 {
        let log = Arc::clone(&log);
        handles.push(thread::spawn(move || {
            for i in 0..5 {
                let record = FeedbackRecord::new(format!("analysis-{}", t), Decision::Accepted)
                    .with_comments(format!("thread {} entry {}", t, i));
                log.append(&record).unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    // Every appended record parses back: no torn or interleaved lines.
    let records = log.scan_all().unwrap();
    assert_eq!(records.len(), 40);
    for record in &records {
        assert_eq!(record.decision, Decision::Accepted);
        assert!(record.comments.as_deref().unwrap().starts_with("thread"));
    }
}

#[test]
fn test_recorder_positions_are_sequential() {
    let temp = TempDir::new().unwrap();
    let log = Arc::new(JsonlFeedbackLog::new(temp.path().join("feedback.jsonl")));
    let recorder = FeedbackRecorder::new(log);

    for expected in 0..4u64 {
        let ack = recorder.record(accepted("entry")).unwrap();
        assert_eq!(ack.position, expected);
    }
}

#[test]
fn test_log_survives_reopen() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("feedback.jsonl");

    {
        let log = JsonlFeedbackLog::new(&path);
        log.append(&accepted("persisted")).unwrap();
    }

    let reopened = JsonlFeedbackLog::new(&path);
    let records = reopened.scan_all().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].comments.as_deref(), Some("persisted"));

    // Positions continue from the existing contents.
    assert_eq!(reopened.append(&accepted("next")).unwrap(), 1);
}
