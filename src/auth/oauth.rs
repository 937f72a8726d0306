//! Google OAuth 2.0 installed-app helpers: PKCE, consent URL, code exchange,
//! and token refresh.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use super::error::AuthError;
use super::types::{unix_now_secs, ClientSecrets, OAuthTokens, TASKS_SCOPE};

/// PKCE verifier/challenge pair plus the anti-forgery `state` value.
#[derive(Debug, Clone)]
pub(crate) struct PkceSession {
    pub(crate) verifier: String,
    pub(crate) challenge: String,
    pub(crate) state: String,
}

impl PkceSession {
    pub(crate) fn generate() -> Self {
        let mut verifier_bytes = [0u8; 64];
        rand::thread_rng().fill_bytes(&mut verifier_bytes);
        let verifier = URL_SAFE_NO_PAD.encode(verifier_bytes);

        let mut state_bytes = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut state_bytes);

        Self {
            challenge: s256_challenge(&verifier),
            verifier,
            state: URL_SAFE_NO_PAD.encode(state_bytes),
        }
    }
}

/// `BASE64URL(SHA256(verifier))` per RFC 7636.
pub(crate) fn s256_challenge(verifier: &str) -> String {
    let digest = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(digest)
}

/// Build the consent URL the user opens in a browser.
pub(crate) fn authorization_url(
    secrets: &ClientSecrets,
    redirect_uri: &str,
    pkce: &PkceSession,
) -> Result<String, AuthError> {
    let url = reqwest::Url::parse_with_params(
        &secrets.auth_uri,
        &[
            ("client_id", secrets.client_id.as_str()),
            ("redirect_uri", redirect_uri),
            ("response_type", "code"),
            ("scope", TASKS_SCOPE),
            ("code_challenge", pkce.challenge.as_str()),
            ("code_challenge_method", "S256"),
            ("state", pkce.state.as_str()),
            ("access_type", "offline"),
            ("prompt", "consent"),
        ],
    )
    .map_err(|err| {
        AuthError::Invalid(format!(
            "invalid auth_uri `{}` in client secrets: {err}",
            secrets.auth_uri
        ))
    })?;
    Ok(url.into())
}

/// OAuth token endpoint response shape.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    /// Omitted on most refresh responses.
    refresh_token: Option<String>,
    expires_in: Option<i64>,
}

/// OAuth error body (`{"error": "invalid_grant", ...}`).
#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Exchange an authorization code for tokens.
pub(crate) async fn exchange_code(
    http: &reqwest::Client,
    secrets: &ClientSecrets,
    code: &str,
    redirect_uri: &str,
    verifier: &str,
) -> Result<OAuthTokens, AuthError> {
    let form = [
        ("grant_type", "authorization_code"),
        ("code", code),
        ("client_id", secrets.client_id.as_str()),
        ("client_secret", secrets.client_secret.as_str()),
        ("redirect_uri", redirect_uri),
        ("code_verifier", verifier),
    ];
    let response = http.post(&secrets.token_uri).form(&form).send().await?;
    let payload = read_token_response(response).await?;
    tokens_from_response(payload, None)
}

/// Refresh an access token with the saved refresh token.
pub(crate) async fn refresh_tokens(
    http: &reqwest::Client,
    secrets: &ClientSecrets,
    current: &OAuthTokens,
) -> Result<OAuthTokens, AuthError> {
    let form = [
        ("grant_type", "refresh_token"),
        ("refresh_token", current.refresh_token.as_str()),
        ("client_id", secrets.client_id.as_str()),
        ("client_secret", secrets.client_secret.as_str()),
    ];
    let response = http.post(&secrets.token_uri).form(&form).send().await?;
    let payload = read_token_response(response).await?;
    tokens_from_response(payload, Some(&current.refresh_token))
}

async fn read_token_response(response: reqwest::Response) -> Result<TokenResponse, AuthError> {
    let status = response.status().as_u16();
    if response.status().is_success() {
        return Ok(response.json().await?);
    }
    let body = response.text().await.unwrap_or_default();
    // A revoked or expired refresh token comes back as 400/401 invalid_grant.
    if let Ok(parsed) = serde_json::from_str::<TokenErrorResponse>(&body) {
        if parsed.error == "invalid_grant" {
            return Err(AuthError::LoginExpired);
        }
        let detail = parsed
            .error_description
            .map(|desc| format!("{}: {desc}", parsed.error))
            .unwrap_or(parsed.error);
        return Err(AuthError::Status(status, detail));
    }
    Err(AuthError::Status(status, body))
}

fn tokens_from_response(
    payload: TokenResponse,
    refresh_fallback: Option<&str>,
) -> Result<OAuthTokens, AuthError> {
    let access_token = payload.access_token.unwrap_or_default().trim().to_string();
    if access_token.is_empty() {
        return Err(AuthError::Invalid(
            "token response did not include access_token".to_string(),
        ));
    }
    let refresh_token = payload
        .refresh_token
        .or_else(|| refresh_fallback.map(str::to_string))
        .unwrap_or_default()
        .trim()
        .to_string();
    if refresh_token.is_empty() {
        return Err(AuthError::Invalid(
            "token response did not include refresh_token; revoke the app's access and login again"
                .to_string(),
        ));
    }
    let expires_in = payload.expires_in.unwrap_or(3600).max(60);
    Ok(OAuthTokens {
        access_token,
        refresh_token,
        expires_at_unix: unix_now_secs().saturating_add(expires_in),
    })
}
