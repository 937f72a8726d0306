//! Saved token persistence.

use std::io::Write;
use std::path::Path;

use super::error::AuthError;
use super::types::{OAuthTokens, TokenHealth};

/// Load saved tokens; a missing file means "not logged in".
pub fn load_tokens(path: &Path) -> Result<Option<OAuthTokens>, AuthError> {
    match std::fs::read_to_string(path) {
        Ok(text) => serde_json::from_str(&text).map(Some).map_err(|err| {
            AuthError::Invalid(format!(
                "failed to parse saved token `{}`: {err}. Run `gtasks login --reset`.",
                path.display()
            ))
        }),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(AuthError::Io(err)),
    }
}

/// Persist tokens with owner-only permissions.
pub fn save_tokens(path: &Path, tokens: &OAuthTokens) -> Result<(), AuthError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let _ = std::fs::set_permissions(parent, std::fs::Permissions::from_mode(0o700));
            }
        }
    }

    let text = serde_json::to_string_pretty(tokens)
        .map_err(|err| AuthError::Invalid(format!("failed to serialize token: {err}")))?;
    let mut options = std::fs::OpenOptions::new();
    options.create(true).truncate(true).write(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(text.as_bytes())?;
    file.flush()?;
    #[cfg(unix)]
    {
        // The mode above only applies on create; tighten pre-existing files too.
        use std::os::unix::fs::PermissionsExt;
        let _ = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600));
    }
    tracing::debug!(path = %path.display(), "saved oauth token");
    Ok(())
}

/// Remove the saved token. Returns `true` when a file was removed.
pub fn reset_tokens(path: &Path) -> Result<bool, AuthError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(AuthError::Io(err)),
    }
}

/// Inspect the saved token without modifying it.
pub fn token_health(path: &Path) -> Result<TokenHealth, AuthError> {
    let tokens = load_tokens(path)?;
    Ok(TokenHealth {
        has_tokens: tokens.is_some(),
        expiring_soon: tokens.as_ref().is_some_and(OAuthTokens::is_expiring_soon),
        expires_at_unix: tokens.map(|value| value.expires_at_unix),
    })
}
