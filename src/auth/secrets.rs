//! Client secrets discovery and parsing.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::error::AuthError;
use super::types::{ClientSecrets, DEFAULT_AUTH_URI, DEFAULT_TOKEN_URI};
use crate::config::default_credentials_path;

/// Local client secrets file checked after the explicit setting.
const LOCAL_CREDENTIALS_FILE: &str = "credentials.json";

#[derive(Debug, Deserialize)]
struct SecretsFile {
    installed: Option<SecretsEntry>,
    web: Option<SecretsEntry>,
}

#[derive(Debug, Deserialize)]
struct SecretsEntry {
    client_id: String,
    #[serde(default)]
    client_secret: String,
    auth_uri: Option<String>,
    token_uri: Option<String>,
}

/// Candidate secrets paths in lookup order.
pub(crate) fn credentials_candidates(explicit: Option<&str>) -> Vec<PathBuf> {
    if let Some(path) = explicit {
        return vec![PathBuf::from(path)];
    }
    let mut out = vec![PathBuf::from(LOCAL_CREDENTIALS_FILE)];
    if let Some(global) = default_credentials_path() {
        out.push(global);
    }
    out
}

/// Load client secrets from the first candidate that exists.
pub fn load_client_secrets(explicit: Option<&str>) -> Result<ClientSecrets, AuthError> {
    let candidates = credentials_candidates(explicit);
    for path in &candidates {
        match std::fs::read_to_string(path) {
            Ok(text) => return parse_client_secrets(&text, path),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => continue,
            Err(err) => return Err(AuthError::Io(err)),
        }
    }
    Err(AuthError::MissingClientSecrets(
        candidates
            .iter()
            .map(|path| path.display().to_string())
            .collect(),
    ))
}

/// Parse an `installed` (or `web`) client registration.
pub(crate) fn parse_client_secrets(text: &str, origin: &Path) -> Result<ClientSecrets, AuthError> {
    let parsed: SecretsFile = serde_json::from_str(text).map_err(|err| {
        AuthError::Invalid(format!(
            "failed to parse client secrets `{}`: {err}",
            origin.display()
        ))
    })?;
    let entry = parsed.installed.or(parsed.web).ok_or_else(|| {
        AuthError::Invalid(format!(
            "client secrets `{}` has neither an `installed` nor a `web` section",
            origin.display()
        ))
    })?;
    let client_id = entry.client_id.trim().to_string();
    if client_id.is_empty() {
        return Err(AuthError::Invalid(format!(
            "client secrets `{}` has an empty client_id",
            origin.display()
        )));
    }
    Ok(ClientSecrets {
        client_id,
        client_secret: entry.client_secret.trim().to_string(),
        auth_uri: entry
            .auth_uri
            .filter(|uri| !uri.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_AUTH_URI.to_string()),
        token_uri: entry
            .token_uri
            .filter(|uri| !uri.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string()),
    })
}
