//! Integration tests for the activity crate
//!
//! These tests drive the sync loops end to end: decoded service bodies in,
//! stored records and iterable pages out.

use std::sync::{Arc, Mutex};

use activity::iter::{Aggregate, RecordIterator};
use activity::leetcode::{decode_progress, decode_submissions};
use activity::models::{Cursor, NumberedPage, Page, RecordKind, TitleSlug};
use activity::storage::{InMemoryRecordStore, RecordStore, SqliteRecordStore, load_record};
use activity::sync::{
    ExponentialBackoff, ProgressFetcher, Retrying, SolvedSync, SubmissionFetcher,
    SubmissionSync, spawn_solved_sync, spawn_submission_sync, sync_submissions,
};
use activity::{ExhaustedError, SyncError};
use chrono::{Duration, Utc};
use tempfile::TempDir;

/// Helper to build a submissions body as the service returns it
fn submissions_body(entries: &[(i64, &str, i64)], has_next: bool, last_key: &str) -> String {
    let dump: Vec<serde_json::Value> = entries
        .iter()
        .map(|(id, slug, age_hours)| {
            let timestamp = (Utc::now() - Duration::hours(*age_hours)).timestamp();
            serde_json::json!({
                "id": id,
                "lang": "rust",
                "time": format!("{} hours", age_hours),
                "timestamp": timestamp,
                "status_display": "Accepted",
                "url": format!("/submissions/detail/{}/", id),
                "title": slug.replace('-', " "),
                "title_slug": slug,
            })
        })
        .collect();

    serde_json::json!({
        "submissions_dump": dump,
        "has_next": has_next,
        "last_key": last_key,
    })
    .to_string()
}

/// Helper to build a progressList body
fn progress_body(current_page: u32, page_num: u32, slugs: &[&str]) -> String {
    let data: Vec<serde_json::Value> = slugs
        .iter()
        .map(|slug| {
            serde_json::json!({
                "totalSolves": 1,
                "question": {
                    "questionFrontendId": "1",
                    "questionTitle": slug,
                    "questionDetailUrl": format!("/problems/{}/", slug),
                    "difficulty": "Medium",
                },
                "lastAcSession": {"time": "1700000000", "wrongAttempts": 0},
            })
        })
        .collect();

    serde_json::json!({
        "data": {
            "solvedQuestionsInfo": {
                "currentPage": current_page,
                "pageNum": page_num,
                "totalNum": page_num * 2,
                "data": data,
            }
        }
    })
    .to_string()
}

/// Replays raw bodies through the real decoders
struct RecordedSubmissions {
    bodies: Mutex<Vec<String>>,
    cursors: Mutex<Vec<Cursor>>,
}

impl RecordedSubmissions {
    fn new(mut bodies: Vec<String>) -> Self {
        bodies.reverse();
        Self {
            bodies: Mutex::new(bodies),
            cursors: Mutex::new(Vec::new()),
        }
    }
}

impl SubmissionFetcher for RecordedSubmissions {
    fn fetch_submissions(&self, cursor: &Cursor, _page_size: usize) -> Result<Page, SyncError> {
        self.cursors.lock().unwrap().push(cursor.clone());
        match self.bodies.lock().unwrap().pop() {
            Some(body) => decode_submissions(&body),
            None => Err(SyncError::Transport("unexpected request".to_string())),
        }
    }
}

/// Progress list where wire pages 0 and 1 both answer page 1
struct RecordedProgress {
    pages: Vec<Vec<&'static str>>,
    wire_pages: Mutex<Vec<u32>>,
}

impl ProgressFetcher for RecordedProgress {
    fn fetch_progress(&self, wire_page: u32, _page_size: usize) -> Result<NumberedPage, SyncError> {
        self.wire_pages.lock().unwrap().push(wire_page);
        let current = wire_page.max(1);
        let slugs = self
            .pages
            .get(current as usize - 1)
            .cloned()
            .unwrap_or_default();
        decode_progress(
            &progress_body(current, self.pages.len() as u32, &slugs),
            Utc::now(),
        )
    }
}

#[test]
fn test_submission_sync_end_to_end() {
    let store = InMemoryRecordStore::new();
    let fetcher = RecordedSubmissions::new(vec![
        submissions_body(
            &[(10, "two-sum", 1), (9, "two-sum", 2), (8, "lru-cache", 5)],
            true,
            "key-1",
        ),
        submissions_body(&[(7, "lru-cache", 30), (6, "word-break", 80)], true, "key-2"),
    ]);
    let request = SubmissionSync::new(Utc::now() - Duration::hours(72));

    let mut seen = Vec::new();
    let records = sync_submissions(&fetcher, &store, &request, &mut |v: f64| seen.push(v)).unwrap();

    // Runs collapse within a page; the page boundary repeat survives
    let slugs: Vec<&str> = records.iter().map(|r| r.slug.as_str()).collect();
    assert_eq!(slugs, vec!["two-sum", "lru-cache", "lru-cache", "word-break"]);

    let cursors = fetcher.cursors.lock().unwrap().clone();
    assert_eq!(cursors.len(), 2);
    assert_eq!(cursors[1].offset, 3);
    assert_eq!(cursors[1].last_key.as_deref(), Some("key-1"));

    assert_eq!(store.len().unwrap(), 3);
    let stored = load_record(&store, &TitleSlug::new("lru-cache"))
        .unwrap()
        .unwrap();
    assert_eq!(stored.id.as_str(), "7");
    assert!(matches!(stored.kind, RecordKind::Submission { .. }));

    assert_eq!(seen.last(), Some(&100.0));
    assert!(seen.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_background_submission_sync_persists_to_sqlite() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("records.db");

    {
        let store: Arc<dyn RecordStore> = Arc::new(SqliteRecordStore::new(&db_path).unwrap());
        let fetcher = RecordedSubmissions::new(vec![
            submissions_body(&[(3, "valid-anagram", 1), (2, "group-anagrams", 2)], true, "k"),
            submissions_body(&[], false, ""),
        ]);
        let request = SubmissionSync::new(Utc::now() - Duration::days(7));

        let task = spawn_submission_sync(fetcher, store, request).unwrap();
        let progress: Vec<f64> = task.progress().collect();
        let records = task.join().unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(progress.last(), Some(&100.0));
    }

    // Reopen and verify persistence
    let store = SqliteRecordStore::new(&db_path).unwrap();
    assert_eq!(store.len().unwrap(), 2);
    let record = load_record(&store, &TitleSlug::new("group-anagrams"))
        .unwrap()
        .unwrap();
    assert_eq!(record.title, "group anagrams");
}

#[test]
fn test_failed_sync_leaves_store_untouched() {
    let store: Arc<dyn RecordStore> = Arc::new(InMemoryRecordStore::new());
    let fetcher = RecordedSubmissions::new(vec![
        submissions_body(&[(1, "a", 1)], true, "k"),
        "<html>Please sign in</html>".to_string(),
    ]);
    let request = SubmissionSync::new(Utc::now() - Duration::days(7));

    let task = spawn_submission_sync(fetcher, store.clone(), request).unwrap();
    let result = task.join();

    assert!(matches!(result, Err(SyncError::Decode(_))));
    assert!(store.is_empty().unwrap());
}

#[test]
fn test_solved_sync_pages_iterate_in_order() {
    let store: Arc<dyn RecordStore> = Arc::new(InMemoryRecordStore::new());
    let fetcher = Arc::new(RecordedProgress {
        pages: vec![
            vec!["two-sum", "add-two-numbers", "median-of-two-sorted-arrays"],
            vec![],
            vec!["jump-game", "n-queens"],
        ],
        wire_pages: Mutex::new(Vec::new()),
    });

    let task = spawn_solved_sync(fetcher.clone(), store.clone(), SolvedSync::new()).unwrap();
    let progress: Vec<f64> = task.progress().collect();
    let pages = task.join().unwrap();

    // The empty second page ends the walk
    assert_eq!(*fetcher.wire_pages.lock().unwrap(), vec![0, 1, 2]);
    assert_eq!(pages.pages().len(), 1);
    assert_eq!(progress.last(), Some(&100.0));

    let mut iter = pages.create_iterator();
    let mut slugs = Vec::new();
    while iter.has_next() {
        slugs.push(iter.next().unwrap().slug.as_str().to_string());
    }
    assert_eq!(
        slugs,
        vec!["two-sum", "add-two-numbers", "median-of-two-sorted-arrays"]
    );
    assert_eq!(iter.next(), Err(ExhaustedError));
    assert_eq!(store.len().unwrap(), 3);
}

#[test]
fn test_solved_sync_walks_every_page() {
    let store: Arc<dyn RecordStore> = Arc::new(InMemoryRecordStore::new());
    let fetcher = Arc::new(RecordedProgress {
        pages: vec![vec!["a", "b", "c"], vec!["d"], vec!["e", "f"]],
        wire_pages: Mutex::new(Vec::new()),
    });

    let task = spawn_solved_sync(fetcher.clone(), store.clone(), SolvedSync::new()).unwrap();
    let pages = task.join().unwrap();

    assert_eq!(*fetcher.wire_pages.lock().unwrap(), vec![0, 1, 2, 3]);
    assert_eq!(pages.total_pages, 3);

    // Restart by building a fresh iterator over the same pages
    for _ in 0..2 {
        let count = pages.create_iterator().into_records().count();
        assert_eq!(count, 6);
    }

    let record = load_record(store.as_ref(), &TitleSlug::new("e"))
        .unwrap()
        .unwrap();
    assert!(matches!(record.kind, RecordKind::Solved { .. }));
}

#[test]
fn test_retrying_fetcher_inside_sync() {
    struct FailsOnce {
        failed: Mutex<bool>,
        inner: RecordedSubmissions,
    }

    impl SubmissionFetcher for FailsOnce {
        fn fetch_submissions(&self, cursor: &Cursor, page_size: usize) -> Result<Page, SyncError> {
            let mut failed = self.failed.lock().unwrap();
            if !*failed {
                *failed = true;
                return Err(SyncError::Transport("connection reset".to_string()));
            }
            drop(failed);
            self.inner.fetch_submissions(cursor, page_size)
        }
    }

    let store = InMemoryRecordStore::new();
    let fetcher = Retrying::new(
        FailsOnce {
            failed: Mutex::new(false),
            inner: RecordedSubmissions::new(vec![submissions_body(&[(1, "a", 1)], false, "")]),
        },
        ExponentialBackoff {
            initial_delay: std::time::Duration::from_millis(1),
            max_jitter: std::time::Duration::ZERO,
            ..ExponentialBackoff::default()
        },
    );
    let request = SubmissionSync::new(Utc::now() - Duration::days(1));

    let records = sync_submissions(&fetcher, &store, &request, &mut |_: f64| {}).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(store.len().unwrap(), 1);
}
