//! LeetCode HTTP client
//!
//! Provides methods for fetching submissions, solved-question progress and
//! problem notes. Uses synchronous HTTP (ureq) to be executor-agnostic.

use chrono::{DateTime, Utc};
use log::debug;
use serde::Serialize;
use url::Url;

use super::api::{
    GraphqlRequest, GraphqlResponse, NoteData, NoteVariables, ProgressListData,
    ProgressListVariables, SubmissionsResponse,
};
use super::normalize::{normalize_solved, normalize_submission};
use super::queries::{NOTE_OPERATION, NOTE_QUERY, PROGRESS_LIST_OPERATION, PROGRESS_LIST_QUERY};
use crate::config::SessionCredentials;
use crate::error::SyncError;
use crate::models::{Cursor, NumberedPage, Page, TitleSlug};
use crate::sync::{ProgressFetcher, SubmissionFetcher};

/// LeetCode API client
pub struct LeetCodeClient {
    credentials: SessionCredentials,
    base_url: Url,
}

impl LeetCodeClient {
    /// Default service root
    const BASE_URL: &'static str = "https://leetcode.com";

    /// Create a client against the public service
    pub fn new(credentials: SessionCredentials) -> Self {
        Self {
            credentials,
            base_url: Url::parse(Self::BASE_URL).expect("BASE_URL is a valid url"),
        }
    }

    /// Create a client against a different service root
    pub fn with_base_url(credentials: SessionCredentials, base_url: &str) -> Result<Self, SyncError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| SyncError::Validation(format!("invalid base url {:?}: {}", base_url, e)))?;
        Ok(Self {
            credentials,
            base_url,
        })
    }

    /// URL for one submissions call
    ///
    /// `lastkey` is sent empty on the first call.
    pub fn submissions_url(&self, cursor: &Cursor, limit: usize) -> Result<Url, SyncError> {
        let mut url = self.join("api/submissions/")?;
        url.query_pairs_mut()
            .append_pair("offset", &cursor.offset.to_string())
            .append_pair("limit", &limit.to_string())
            .append_pair("lastkey", cursor.last_key.as_deref().unwrap_or(""));
        Ok(url)
    }

    /// Fetch one page of the submissions dump
    pub fn list_submissions(&self, cursor: &Cursor, limit: usize) -> Result<Page, SyncError> {
        let url = self.submissions_url(cursor, limit)?;
        debug!("GET submissions offset={} limit={}", cursor.offset, limit);

        let mut response = ureq::get(url.as_str())
            .header("Content-Type", "application/json")
            .header("x-csrftoken", &self.credentials.csrf_token)
            .header("Referer", self.base_url.as_str())
            .header("Cookie", &self.credentials.cookie_header())
            .call()?;

        let body = response.body_mut().read_to_string()?;
        decode_submissions(&body)
    }

    /// Fetch one page of the solved-questions progress list
    pub fn list_progress(&self, page_no: u32, per_page: usize) -> Result<NumberedPage, SyncError> {
        debug!("POST progressList pageNo={} numPerPage={}", page_no, per_page);
        let variables = ProgressListVariables {
            page_no,
            num_per_page: per_page,
            filters: serde_json::Map::new(),
        };
        let body = self.post_graphql(
            PROGRESS_LIST_OPERATION,
            PROGRESS_LIST_QUERY,
            variables,
            "progress/",
        )?;
        decode_progress(&body, Utc::now())
    }

    /// Fetch the user's note for a problem; `None` when no note is saved
    pub fn fetch_note(&self, slug: &TitleSlug) -> Result<Option<String>, SyncError> {
        debug!("POST questionNote titleSlug={}", slug);
        let variables = NoteVariables {
            title_slug: slug.as_str(),
        };
        let body = self.post_graphql(NOTE_OPERATION, NOTE_QUERY, variables, "")?;
        decode_note(&body)
    }

    fn post_graphql<V: Serialize>(
        &self,
        operation_name: &str,
        query: &str,
        variables: V,
        referer_path: &str,
    ) -> Result<String, SyncError> {
        let url = self.join("graphql")?;
        let referer = self.join(referer_path)?;
        let payload = GraphqlRequest {
            query,
            variables,
            operation_name,
        };

        let mut response = ureq::post(url.as_str())
            .header("x-csrftoken", &self.credentials.csrf_token)
            .header("Referer", referer.as_str())
            .header("Cookie", &self.credentials.cookie_header())
            .send_json(&payload)?;

        Ok(response.body_mut().read_to_string()?)
    }

    fn join(&self, path: &str) -> Result<Url, SyncError> {
        self.base_url
            .join(path)
            .map_err(|e| SyncError::Validation(format!("invalid request path {:?}: {}", path, e)))
    }
}

impl SubmissionFetcher for LeetCodeClient {
    fn fetch_submissions(&self, cursor: &Cursor, page_size: usize) -> Result<Page, SyncError> {
        self.list_submissions(cursor, page_size)
    }
}

impl ProgressFetcher for LeetCodeClient {
    fn fetch_progress(&self, wire_page: u32, page_size: usize) -> Result<NumberedPage, SyncError> {
        self.list_progress(wire_page, page_size)
    }
}

/// Decode a submissions response body into a page
///
/// Records keep the service order. An empty `last_key` means no
/// continuation.
pub fn decode_submissions(body: &str) -> Result<Page, SyncError> {
    let response: SubmissionsResponse = serde_json::from_str(body)?;
    let records = response
        .submissions_dump
        .into_iter()
        .map(normalize_submission)
        .collect::<Result<Vec<_>, _>>()?;
    let next_cursor = response.last_key.filter(|key| !key.is_empty());

    Ok(Page::new(records, next_cursor, response.has_next))
}

/// Decode a `progressList` response body into a numbered page
pub fn decode_progress(body: &str, now: DateTime<Utc>) -> Result<NumberedPage, SyncError> {
    let response: GraphqlResponse<ProgressListData> = serde_json::from_str(body)?;
    let data = graphql_data(response)?;
    let info = data.solved_questions_info;

    let records = info
        .data
        .into_iter()
        .map(|item| normalize_solved(item, now))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(NumberedPage {
        records,
        page_number: info.current_page,
        total_pages: info.page_num,
        total_records: info.total_num,
    })
}

/// Decode a `questionNote` response body
pub fn decode_note(body: &str) -> Result<Option<String>, SyncError> {
    let response: GraphqlResponse<NoteData> = serde_json::from_str(body)?;
    let data = graphql_data(response)?;
    Ok(data
        .question
        .and_then(|q| q.note)
        .filter(|note| !note.trim().is_empty()))
}

fn graphql_data<T>(response: GraphqlResponse<T>) -> Result<T, SyncError> {
    match response.data {
        Some(data) => Ok(data),
        None => {
            let message = response
                .errors
                .first()
                .map(|e| e.message.clone())
                .unwrap_or_else(|| "response has no data".to_string());
            Err(SyncError::Decode(message))
        }
    }
}
