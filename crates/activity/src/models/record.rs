//! Record model representing one unit of retrieved activity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier the service assigns to a record
///
/// Not unique across pages (a problem's frontend id repeats for every
/// solve), so it is never used as a storage key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Problem slug (e.g. "two-sum"), the grouping key for dedup and storage
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TitleSlug(pub String);

impl TitleSlug {
    const PROBLEMS_URL: &'static str = "https://leetcode.com/problems";

    pub fn new(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Storage key bytes
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Public problem page for this slug
    pub fn problem_url(&self) -> String {
        format!("{}/{}/", Self::PROBLEMS_URL, self.0)
    }

    /// Extract the slug from a detail URL such as "/problems/two-sum/"
    pub fn from_detail_url(url: &str) -> Option<Self> {
        let mut parts = url.split('/').filter(|p| !p.is_empty());
        match (parts.next(), parts.next()) {
            (Some("problems"), Some(slug)) => Some(Self::new(slug)),
            _ => None,
        }
    }
}

impl From<&str> for TitleSlug {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for TitleSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind-specific detail carried by a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordKind {
    /// One submission attempt from the submissions dump
    Submission {
        lang: String,
        status: Option<String>,
        url: String,
    },
    /// One solved problem from the progress list
    Solved {
        difficulty: String,
        total_solves: u32,
        wrong_attempts: u32,
    },
}

/// A single activity record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Service-assigned id (submission id or problem frontend id)
    pub id: RecordId,
    /// Display title (problem title)
    pub title: String,
    /// Natural-language time marker, e.g. "2 days, 3 hours ago"
    pub time_marker: String,
    /// Grouping key used for dedup and as the storage key
    pub slug: TitleSlug,
    /// When the activity happened; compared against the sync threshold
    pub timestamp: DateTime<Utc>,
    /// Kind-specific detail
    #[serde(flatten)]
    pub kind: RecordKind,
}

impl Record {
    pub fn builder(id: impl Into<RecordId>, slug: impl Into<TitleSlug>) -> RecordBuilder {
        RecordBuilder::new(id.into(), slug.into())
    }
}

/// Builder for records; mostly used by normalization and tests
pub struct RecordBuilder {
    id: RecordId,
    slug: TitleSlug,
    title: String,
    time_marker: String,
    timestamp: DateTime<Utc>,
    kind: RecordKind,
}

impl RecordBuilder {
    fn new(id: RecordId, slug: TitleSlug) -> Self {
        Self {
            id,
            slug,
            title: String::new(),
            time_marker: String::new(),
            timestamp: Utc::now(),
            kind: RecordKind::Submission {
                lang: String::new(),
                status: None,
                url: String::new(),
            },
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn time_marker(mut self, marker: impl Into<String>) -> Self {
        self.time_marker = marker.into();
        self
    }

    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn kind(mut self, kind: RecordKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn build(self) -> Record {
        Record {
            id: self.id,
            title: self.title,
            time_marker: self.time_marker,
            slug: self.slug,
            timestamp: self.timestamp,
            kind: self.kind,
        }
    }
}

/// Something with a stable grouping key
pub trait Identifiable {
    /// Key used for consecutive dedup and as the storage key
    fn grouping_key(&self) -> &TitleSlug;

    /// Service-assigned id
    fn record_id(&self) -> &RecordId;
}

/// Something a list view can render
pub trait Displayable {
    fn title(&self) -> &str;

    fn description(&self) -> String;

    /// Text matched by list filtering
    fn filter_value(&self) -> &str {
        self.title()
    }
}

impl Identifiable for Record {
    fn grouping_key(&self) -> &TitleSlug {
        &self.slug
    }

    fn record_id(&self) -> &RecordId {
        &self.id
    }
}

impl Displayable for Record {
    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> String {
        match &self.kind {
            RecordKind::Submission { lang, .. } => format!("{} | {}", self.time_marker, lang),
            RecordKind::Solved { difficulty, .. } => {
                format!("{} | {}", difficulty, self.time_marker)
            }
        }
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.id.as_str(), self.title)
    }
}

/// Render how long ago `timestamp` was, relative to `now`
pub fn time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - timestamp).num_seconds();
    if secs < 60 {
        return "just now".to_string();
    }

    const UNITS: [(i64, &str); 6] = [
        (365 * 24 * 3600, "year"),
        (30 * 24 * 3600, "month"),
        (7 * 24 * 3600, "week"),
        (24 * 3600, "day"),
        (3600, "hour"),
        (60, "minute"),
    ];

    let (size, name) = UNITS
        .iter()
        .copied()
        .find(|(size, _)| secs >= *size)
        .unwrap_or((60, "minute"));
    let count = secs / size;
    let plural = if count == 1 { "" } else { "s" };
    format!("{} {}{} ago", count, name, plural)
}
