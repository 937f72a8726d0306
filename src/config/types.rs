//! Configuration data model.
//!
//! Struct/enum definitions plus default values only. Source discovery and
//! environment overrides live in sibling modules.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::defaults::{
    DEFAULT_API_BASE_URL, DEFAULT_API_TIMEOUT_SECS, DEFAULT_LIST_PAGE_SIZE, DEFAULT_REDIRECT_PORT,
};

/// Authorization flow used when no reusable token is saved.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum AuthFlow {
    /// Loopback callback server plus the system browser.
    #[default]
    Auto,
    /// Loopback callback server plus the `carbonyl` terminal browser.
    Carbonyl,
    /// Print the consent URL and read the pasted redirect URL or code.
    Manual,
}

impl AuthFlow {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Carbonyl => "carbonyl",
            Self::Manual => "manual",
        }
    }

    /// Parse a flow name case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "carbonyl" => Some(Self::Carbonyl),
            "manual" | "console" => Some(Self::Manual),
            _ => None,
        }
    }
}

/// Top-level runtime configuration (`gtasks.toml`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub auth: AuthConfig,
    pub display: DisplayConfig,
}

/// Remote Tasks API settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Per-request HTTP timeout.
    pub timeout_secs: u64,
    /// `maxResults` used when listing task lists.
    pub list_page_size: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: DEFAULT_API_TIMEOUT_SECS,
            list_page_size: DEFAULT_LIST_PAGE_SIZE,
        }
    }
}

/// Credential provider settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub flow: AuthFlow,
    /// Google "installed app" client secrets JSON.
    pub credentials_file: Option<String>,
    /// Where refreshed tokens are persisted.
    pub token_file: Option<String>,
    /// Loopback port for the callback server; 0 picks a free port.
    pub redirect_port: u16,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            flow: AuthFlow::default(),
            credentials_file: None,
            token_file: None,
            redirect_port: DEFAULT_REDIRECT_PORT,
        }
    }
}

/// Display / rendering preferences.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub color: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

/// Result of `gtasks init`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlobalConfigInitResult {
    Created { path: PathBuf },
    AlreadyInitialized { path: PathBuf },
    Overwritten { path: PathBuf, backup_path: PathBuf },
}
