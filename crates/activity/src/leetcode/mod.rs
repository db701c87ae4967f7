//! LeetCode API integration
//!
//! This module provides:
//! - HTTP client for the submissions dump and the GraphQL progress list
//! - Response decoding and normalization to [`Record`](crate::models::Record)

mod client;
mod normalize;
mod queries;

pub use client::{LeetCodeClient, decode_note, decode_progress, decode_submissions};
pub use normalize::{normalize_solved, normalize_submission};

/// LeetCode API response types
pub mod api {
    use serde::{Deserialize, Serialize};

    /// Response from `/api/submissions/`
    #[derive(Debug, Deserialize)]
    pub struct SubmissionsResponse {
        #[serde(default)]
        pub submissions_dump: Vec<SubmissionDump>,
        #[serde(default)]
        pub has_next: bool,
        #[serde(default)]
        pub last_key: Option<String>,
    }

    /// One submission attempt
    #[derive(Debug, Clone, Deserialize)]
    pub struct SubmissionDump {
        pub id: i64,
        pub lang: String,
        /// Relative time, e.g. "1 week, 2 days"
        pub time: String,
        /// Unix seconds
        pub timestamp: i64,
        #[serde(default)]
        pub status_display: Option<String>,
        #[serde(default)]
        pub url: String,
        pub title: String,
        pub title_slug: String,
    }

    /// GraphQL request envelope
    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GraphqlRequest<'a, V> {
        pub query: &'a str,
        pub variables: V,
        pub operation_name: &'a str,
    }

    /// GraphQL response envelope
    #[derive(Debug, Deserialize)]
    pub struct GraphqlResponse<T> {
        pub data: Option<T>,
        #[serde(default)]
        pub errors: Vec<GraphqlError>,
    }

    #[derive(Debug, Deserialize)]
    pub struct GraphqlError {
        pub message: String,
    }

    /// Variables for the `progressList` operation
    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProgressListVariables {
        pub page_no: u32,
        pub num_per_page: usize,
        pub filters: serde_json::Map<String, serde_json::Value>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProgressListData {
        pub solved_questions_info: SolvedQuestionsInfo,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SolvedQuestionsInfo {
        pub current_page: u32,
        /// Total number of pages
        pub page_num: u32,
        /// Total number of solved questions
        pub total_num: u32,
        #[serde(default)]
        pub data: Vec<SolvedQuestionItem>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SolvedQuestionItem {
        #[serde(default)]
        pub total_solves: u32,
        pub question: ProgressQuestion,
        pub last_ac_session: Option<LastAcSession>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProgressQuestion {
        pub question_frontend_id: String,
        pub question_title: String,
        /// e.g. "/problems/two-sum/"
        pub question_detail_url: String,
        pub difficulty: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct LastAcSession {
        pub time: TimeValue,
        #[serde(default)]
        pub wrong_attempts: u32,
    }

    /// Timestamps arrive either as numbers or as strings
    #[derive(Debug, Clone, Deserialize)]
    #[serde(untagged)]
    pub enum TimeValue {
        Seconds(i64),
        Text(String),
    }

    /// Variables for the `questionNote` operation
    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct NoteVariables<'a> {
        pub title_slug: &'a str,
    }

    #[derive(Debug, Deserialize)]
    pub struct NoteData {
        pub question: Option<NoteQuestion>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct NoteQuestion {
        pub question_id: String,
        pub note: Option<String>,
    }
}
