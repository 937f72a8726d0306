//! Auth subsystem error definitions.

use std::fmt;

/// Errors surfaced by the credential provider.
#[derive(Debug)]
pub enum AuthError {
    Io(std::io::Error),
    Http(reqwest::Error),
    Status(u16, String),
    Invalid(String),
    /// No client secrets file could be found.
    MissingClientSecrets(Vec<String>),
    /// The user denied consent or the provider returned an OAuth error.
    Denied(String),
    /// No saved token and no interactive flow available.
    NotLoggedIn,
    /// The saved refresh token was rejected.
    LoginExpired,
    TimedOut,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io: {err}"),
            Self::Http(err) => write!(f, "http: {err}"),
            Self::Status(code, body) => write!(f, "status {code}: {body}"),
            Self::Invalid(msg) => write!(f, "{msg}"),
            Self::MissingClientSecrets(searched) => write!(
                f,
                "no OAuth client secrets found (looked in: {}); download credentials.json for a Desktop OAuth client and set auth.credentials_file",
                searched.join(", ")
            ),
            Self::Denied(msg) => write!(f, "authorization was not granted: {msg}"),
            Self::NotLoggedIn => write!(f, "not logged in; run `gtasks login`"),
            Self::LoginExpired => write!(
                f,
                "saved login has expired or was revoked; run `gtasks login` again"
            ),
            Self::TimedOut => write!(f, "timed out waiting for the authorization redirect"),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<std::io::Error> for AuthError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}
