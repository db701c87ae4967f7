//! Command implementations
//!
//! Each command builds its collaborators (credentials, client, store) from
//! the config directory and hands them to the activity crate.

use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;

use activity::iter::{Aggregate, RecordIterator};
use activity::storage::{RecordStore, SqliteRecordStore, load_record};
use activity::sync::{
    ExponentialBackoff, Retrying, SolvedSync, SubmissionSync, SyncTask, spawn_solved_sync,
    spawn_submission_sync,
};
use activity::{Displayable, LeetCodeClient, Record, SessionCredentials, SyncSettings, TitleSlug};
use anyhow::{Context, Result};
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};

/// Database filename in the grind data directory
const RECORDS_DB: &str = "records.db";

pub fn submissions(days: Option<i64>, filter: Option<&str>) -> Result<()> {
    let settings = SyncSettings::load()?;
    let days = days.unwrap_or(settings.lookback_days);
    let request = SubmissionSync::lookback_days(days).page_size(settings.submissions_page_size);
    let client = Retrying::new(connect(&settings)?, ExponentialBackoff::default())
        .cancel_token(request.cancel.clone());

    let task = spawn_submission_sync(client, open_store()?, request)?;
    let records = follow(task, &format!("Submissions ({}d)", days))?;

    for record in records.iter().filter(|r| matches_filter(*r, filter)) {
        print_record(record);
    }
    info!("{} submissions in the last {} days", records.len(), days);
    Ok(())
}

pub fn progress(filter: Option<&str>) -> Result<()> {
    let settings = SyncSettings::load()?;
    let request = SolvedSync::new().page_size(settings.progress_page_size);
    let client = Retrying::new(connect(&settings)?, ExponentialBackoff::default())
        .cancel_token(request.cancel.clone());

    let task = spawn_solved_sync(client, open_store()?, request)?;
    let pages = follow(task, "Solved")?;

    let mut iter = pages.create_iterator();
    while iter.has_next() {
        let record = iter.next()?;
        if matches_filter(record, filter) {
            print_record(record);
        }
    }
    info!(
        "{} solved problems across {} pages",
        pages.record_count(),
        pages.pages().len()
    );
    Ok(())
}

pub fn note(slug: &str) -> Result<()> {
    let settings = SyncSettings::load()?;
    let client = connect(&settings)?;
    match client.fetch_note(&TitleSlug::new(slug))? {
        Some(note) => println!("{}", note),
        None => println!("No note saved for {}", slug),
    }
    Ok(())
}

pub fn show(slug: &str) -> Result<()> {
    let store = open_store()?;
    let slug = TitleSlug::new(slug);
    let Some(record) = load_record(store.as_ref(), &slug)? else {
        println!("{} has not been synced yet", slug);
        return Ok(());
    };

    println!("{}", record);
    println!("  {}", record.description());
    println!("  last activity {}", activity::time_ago(record.timestamp, Utc::now()));
    println!("  {}", record.slug.problem_url());
    Ok(())
}

pub fn open(slug: &str) -> Result<()> {
    let url = TitleSlug::new(slug).problem_url();
    info!("Opening {}", url);
    open::that(&url).with_context(|| format!("Failed to open {}", url))
}

fn connect(settings: &SyncSettings) -> Result<LeetCodeClient> {
    let credentials = SessionCredentials::load().map_err(|e| {
        if let Some(path) = SessionCredentials::default_credentials_path() {
            warn!(
                "To configure LeetCode access, either:\n\
                 1. Save your browser cookies to: {}\n\
                 2. Or set environment variables: LEETCODE_CSRF_TOKEN and LEETCODE_SESSION",
                path.display()
            );
        }
        e
    })?;
    Ok(LeetCodeClient::with_base_url(credentials, &settings.base_url)?)
}

fn open_store() -> Result<Arc<dyn RecordStore>> {
    let path = config::ensure_data_dir()?.join(RECORDS_DB);
    let store = SqliteRecordStore::new(&path)
        .with_context(|| format!("Failed to open record store at {}", path.display()))?;
    Ok(Arc::new(store))
}

/// Drive a progress bar from the task until it finishes
fn follow<T: Send + 'static>(task: SyncTask<T>, label: &str) -> Result<T> {
    let bar = progress_bar(label);
    for value in task.progress() {
        bar.set_position(value.round() as u64);
    }
    bar.finish_and_clear();
    Ok(task.join()?)
}

fn progress_bar(label: &str) -> ProgressBar {
    if !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(100);
    if let Ok(style) =
        ProgressStyle::with_template("{spinner:.cyan} {prefix} [{bar:40.cyan/blue}] {pos:>3}%")
    {
        bar.set_style(style);
    }
    bar.set_prefix(label.to_string());
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

fn matches_filter(record: &Record, filter: Option<&str>) -> bool {
    match filter {
        Some(needle) => record
            .filter_value()
            .to_lowercase()
            .contains(&needle.to_lowercase()),
        None => true,
    }
}

fn print_record(record: &Record) {
    println!("{:<50} {}", record.title(), record.description());
}
