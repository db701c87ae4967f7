//! Configuration loading for the sync engine
//!
//! Session credentials are loaded from (in order of priority):
//! 1. JSON file in the grind config directory
//! 2. Runtime environment variables
//!
//! Sync settings come from an optional JSON file with per-field defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Credentials filename in the grind config directory
const CREDENTIALS_FILE: &str = "leetcode-session.json";

/// Settings filename in the grind config directory
const SETTINGS_FILE: &str = "settings.json";

const CSRF_ENV: &str = "LEETCODE_CSRF_TOKEN";
const SESSION_ENV: &str = "LEETCODE_SESSION";

/// Browser session credentials attached to every request
#[derive(Clone, Deserialize)]
pub struct SessionCredentials {
    #[serde(rename = "csrftoken")]
    pub csrf_token: String,
    #[serde(rename = "LEETCODE_SESSION")]
    pub session: String,
}

impl std::fmt::Debug for SessionCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCredentials")
            .field("csrf_token", &"<redacted>")
            .field("session", &"<redacted>")
            .finish()
    }
}

impl SessionCredentials {
    pub fn new(csrf_token: impl Into<String>, session: impl Into<String>) -> Self {
        Self {
            csrf_token: csrf_token.into(),
            session: session.into(),
        }
    }

    /// Load credentials using the following priority:
    /// 1. JSON file (~/.config/grind/leetcode-session.json)
    /// 2. Runtime environment variables
    pub fn load() -> Result<Self> {
        if config::config_exists(CREDENTIALS_FILE) {
            let creds: SessionCredentials = config::load_json(CREDENTIALS_FILE)?;
            return creds.validated();
        }

        Self::from_env()
    }

    /// Load credentials from a specific JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let creds: SessionCredentials = config::load_json_file(path)?;
        creds.validated()
    }

    /// Parse credentials from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let creds: SessionCredentials =
            serde_json::from_str(json).context("Failed to parse credentials JSON")?;
        creds.validated()
    }

    /// Load credentials from environment variables
    pub fn from_env() -> Result<Self> {
        let csrf_token = std::env::var(CSRF_ENV)
            .with_context(|| format!("{} environment variable not set", CSRF_ENV))?;
        let session = std::env::var(SESSION_ENV)
            .with_context(|| format!("{} environment variable not set", SESSION_ENV))?;

        Self::new(csrf_token, session).validated()
    }

    /// Get the default credentials file path (~/.config/grind/leetcode-session.json)
    pub fn default_credentials_path() -> Option<PathBuf> {
        config::config_path(CREDENTIALS_FILE)
    }

    /// Value for the `Cookie` request header
    pub fn cookie_header(&self) -> String {
        format!(
            "csrftoken={}; LEETCODE_SESSION={}",
            self.csrf_token, self.session
        )
    }

    fn validated(self) -> Result<Self> {
        anyhow::ensure!(!self.csrf_token.trim().is_empty(), "csrftoken is empty");
        anyhow::ensure!(!self.session.trim().is_empty(), "LEETCODE_SESSION is empty");
        Ok(self)
    }
}

/// Tunables for sync invocations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    /// Records requested per submissions call
    pub submissions_page_size: usize,
    /// Records requested per progress-list call
    pub progress_page_size: usize,
    /// How far back the submission walk goes by default
    pub lookback_days: i64,
    /// Service root; request paths are joined onto it
    pub base_url: String,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            submissions_page_size: 20,
            progress_page_size: 10,
            lookback_days: 30,
            base_url: "https://leetcode.com".to_string(),
        }
    }
}

impl SyncSettings {
    /// Load settings from ~/.config/grind/settings.json, or defaults
    pub fn load() -> Result<Self> {
        config::load_json_or_default(SETTINGS_FILE)
    }

    /// Parse settings from a JSON string; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse settings JSON")
    }
}
