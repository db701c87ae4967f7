//! LeetCode API response normalization
//!
//! Converts API payloads to domain records.

use chrono::{DateTime, TimeZone, Utc};

use super::api::{SolvedQuestionItem, SubmissionDump, TimeValue};
use crate::error::SyncError;
use crate::models::{Record, RecordKind, TitleSlug, time_ago};

/// Normalize one entry of the submissions dump
pub fn normalize_submission(dump: SubmissionDump) -> Result<Record, SyncError> {
    let timestamp = from_unix_seconds(dump.timestamp).ok_or_else(|| {
        SyncError::Decode(format!(
            "submission {} has invalid timestamp {}",
            dump.id, dump.timestamp
        ))
    })?;

    Ok(Record::builder(dump.id, TitleSlug::new(dump.title_slug))
        .title(dump.title)
        .time_marker(format!("{} ago", dump.time.trim()))
        .timestamp(timestamp)
        .kind(RecordKind::Submission {
            lang: dump.lang,
            status: dump.status_display,
            url: dump.url,
        })
        .build())
}

/// Normalize one solved-question entry of the progress list
///
/// The service only sends a timestamp for the last accepted session, so the
/// time marker is rendered relative to `now`. Entries without an accepted
/// session fall back to the epoch.
pub fn normalize_solved(item: SolvedQuestionItem, now: DateTime<Utc>) -> Result<Record, SyncError> {
    let question = item.question;
    let slug = TitleSlug::from_detail_url(&question.question_detail_url).ok_or_else(|| {
        SyncError::Decode(format!(
            "question {} has unexpected detail url {:?}",
            question.question_frontend_id, question.question_detail_url
        ))
    })?;

    let (timestamp, wrong_attempts) = match item.last_ac_session {
        Some(session) => (parse_time_value(&session.time)?, session.wrong_attempts),
        None => (DateTime::<Utc>::UNIX_EPOCH, 0),
    };

    let time_marker = if timestamp == DateTime::<Utc>::UNIX_EPOCH {
        "never".to_string()
    } else {
        time_ago(timestamp, now)
    };

    Ok(Record::builder(question.question_frontend_id.as_str(), slug)
        .title(question.question_title)
        .time_marker(time_marker)
        .timestamp(timestamp)
        .kind(RecordKind::Solved {
            difficulty: question.difficulty,
            total_solves: item.total_solves,
            wrong_attempts,
        })
        .build())
}

/// Accepts unix seconds as a number or numeric string, or an RFC 3339 string
fn parse_time_value(value: &TimeValue) -> Result<DateTime<Utc>, SyncError> {
    let parsed = match value {
        TimeValue::Seconds(secs) => from_unix_seconds(*secs),
        TimeValue::Text(text) => match text.trim().parse::<i64>() {
            Ok(secs) => from_unix_seconds(secs),
            Err(_) => DateTime::parse_from_rfc3339(text.trim())
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
        },
    };
    parsed.ok_or_else(|| SyncError::Decode(format!("unrecognized time value {:?}", value)))
}

fn from_unix_seconds(secs: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(secs, 0).single()
}
