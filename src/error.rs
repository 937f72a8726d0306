//! Unified error types for gtasks.

use crate::auth::AuthError;
use std::fmt;

// ---------------------------------------------------------------------------
// StoreError
// ---------------------------------------------------------------------------

/// Unrecoverable failures of the local preference store.
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Serialize(serde_json::Error),
    /// No per-user config directory could be resolved on this platform.
    NoConfigDir,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Serialize(e) => write!(f, "serialize: {e}"),
            Self::NoConfigDir => write!(f, "unable to resolve a per-user config directory"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialize(e)
    }
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors when loading or parsing `gtasks.toml`.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Toml(e) => write!(f, "toml: {e}"),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e)
    }
}

// ---------------------------------------------------------------------------
// ApiError
// ---------------------------------------------------------------------------

/// Errors from the remote Tasks API layer.
#[derive(Debug)]
pub enum ApiError {
    /// Network / reqwest-level error.
    Http(reqwest::Error),
    /// Non-2xx status. `message` is the server's error message when the body
    /// carried one, otherwise the raw body.
    Status { code: u16, message: String },
    /// The credential provider could not produce a bearer token.
    Auth(AuthError),
    /// The request could not be built (bad base URL or identifier).
    InvalidRequest(String),
    /// A 2xx response whose body did not match the expected shape.
    InvalidResponse(String),
}

impl ApiError {
    /// Build a status error from a raw response body.
    pub fn status(code: u16, body: &str) -> Self {
        Self::Status {
            code,
            message: extract_error_message(body),
        }
    }

    /// HTTP status code for status errors.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "http: {e}"),
            Self::Status { code, message } => write!(f, "{message} (HTTP {code})"),
            Self::Auth(e) => write!(f, "auth: {e}"),
            Self::InvalidRequest(msg) => write!(f, "invalid request: {msg}"),
            Self::InvalidResponse(msg) => write!(f, "invalid response: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        Self::Auth(e)
    }
}

/// Pull `error.message` out of a Google-style JSON error body.
fn extract_error_message(body: &str) -> String {
    let trimmed = body.trim();
    serde_json::from_str::<serde_json::Value>(trimmed)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| trimmed.to_string())
}

// ---------------------------------------------------------------------------
// CommandError
// ---------------------------------------------------------------------------

/// Failures surfaced by the command resolver.
#[derive(Debug)]
pub enum CommandError {
    /// Mutually exclusive arguments were both supplied.
    ConflictingArguments(String),
    /// A required choice between arguments was left empty.
    MissingArgument(String),
    /// No explicit list and no persisted current list.
    NoCurrentList,
    /// Name lookup found no task list with that exact title.
    NotFound(String),
    /// Local preference storage failed.
    Storage(StoreError),
    /// The remote API failed; the message is passed through.
    Remote(ApiError),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConflictingArguments(msg) | Self::MissingArgument(msg) => write!(f, "{msg}"),
            Self::NoCurrentList => write!(
                f,
                "No current task list set. Run `gtasks use list --id <ID>` or `gtasks use list --name <NAME>` first."
            ),
            Self::NotFound(name) => write!(f, "Task list with name '{name}' not found."),
            Self::Storage(e) => write!(f, "preferences: {e}"),
            Self::Remote(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<StoreError> for CommandError {
    fn from(e: StoreError) -> Self {
        Self::Storage(e)
    }
}

impl From<ApiError> for CommandError {
    fn from(e: ApiError) -> Self {
        Self::Remote(e)
    }
}
