//! Public auth model types.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

const REFRESH_SAFETY_WINDOW_SECS: i64 = 90;

/// Google OAuth authorization endpoint used when the secrets file omits one.
pub(crate) const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
/// Google OAuth token endpoint used when the secrets file omits one.
pub(crate) const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
/// Read/write access to Google Tasks.
pub const TASKS_SCOPE: &str = "https://www.googleapis.com/auth/tasks";

/// Saved OAuth tokens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OAuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at_unix: i64,
}

impl OAuthTokens {
    pub fn is_expiring_soon(&self) -> bool {
        unix_now_secs().saturating_add(REFRESH_SAFETY_WINDOW_SECS) >= self.expires_at_unix
    }
}

/// OAuth client registration read from a Google `credentials.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSecrets {
    pub client_id: String,
    pub client_secret: String,
    pub auth_uri: String,
    pub token_uri: String,
}

/// Health summary for the saved token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenHealth {
    pub has_tokens: bool,
    pub expiring_soon: bool,
    pub expires_at_unix: Option<i64>,
}

pub(crate) fn unix_now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
