//! Credential provider: hands out bearer tokens for Tasks API calls.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::error::AuthError;
use super::flows::{self, LoginStep};
use super::oauth;
use super::secrets::load_client_secrets;
use super::store::{load_tokens, save_tokens};
use super::types::OAuthTokens;
use crate::config::{default_token_path, AuthConfig, AuthFlow};

const AUTH_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Callback used to show login progress to the user.
pub type LoginNotifier = Arc<dyn Fn(LoginStep<'_>) + Send + Sync>;

/// Source of access tokens for the remote client.
///
/// Tests substitute a static token; production uses
/// [`GoogleCredentialProvider`].
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Return a usable access token, refreshing or logging in as needed.
    async fn access_token(&self) -> Result<String, AuthError>;

    /// Force a refresh after the server rejected the current token.
    async fn refresh(&self) -> Result<String, AuthError>;
}

/// Google OAuth-backed provider with an on-disk token cache.
pub struct GoogleCredentialProvider {
    http: reqwest::Client,
    credentials_file: Option<String>,
    token_path: PathBuf,
    flow: AuthFlow,
    redirect_port: u16,
    notifier: Option<LoginNotifier>,
    cached: Mutex<Option<OAuthTokens>>,
}

impl GoogleCredentialProvider {
    /// Build a provider from `[auth]` settings.
    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        let token_path = match config.token_file.as_deref() {
            Some(path) => PathBuf::from(path),
            None => default_token_path().ok_or_else(|| {
                AuthError::Invalid(
                    "could not resolve a config directory for the token file; set auth.token_file"
                        .to_string(),
                )
            })?,
        };
        Ok(Self {
            http: shared_auth_http_client().clone(),
            credentials_file: config.credentials_file.clone(),
            token_path,
            flow: config.flow,
            redirect_port: config.redirect_port,
            notifier: None,
            cached: Mutex::new(None),
        })
    }

    /// Allow interactive login when no usable token is saved.
    pub fn with_login_notifier(mut self, notifier: LoginNotifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn token_path(&self) -> &Path {
        &self.token_path
    }

    pub fn flow(&self) -> AuthFlow {
        self.flow
    }

    /// Run the configured login flow unconditionally and persist the result.
    pub async fn login(&self) -> Result<(), AuthError> {
        let notifier = self.notifier.clone().ok_or(AuthError::NotLoggedIn)?;
        let mut cached = self.cached.lock().await;
        let tokens = self.run_login(&notifier).await?;
        *cached = Some(tokens);
        Ok(())
    }

    async fn run_login(&self, notifier: &LoginNotifier) -> Result<OAuthTokens, AuthError> {
        let secrets = load_client_secrets(self.credentials_file.as_deref())?;
        let tokens = flows::authorize(
            &self.http,
            &secrets,
            self.flow,
            self.redirect_port,
            notifier.as_ref(),
        )
        .await?;
        save_tokens(&self.token_path, &tokens)?;
        tracing::info!(path = %self.token_path.display(), "saved new login");
        Ok(tokens)
    }

    async fn refresh_and_save(&self, current: &OAuthTokens) -> Result<OAuthTokens, AuthError> {
        let secrets = load_client_secrets(self.credentials_file.as_deref())?;
        let refreshed = oauth::refresh_tokens(&self.http, &secrets, current).await?;
        save_tokens(&self.token_path, &refreshed)?;
        tracing::debug!("refreshed access token");
        Ok(refreshed)
    }

    /// Interactive login when allowed, otherwise the given error.
    async fn login_or(&self, err: AuthError) -> Result<OAuthTokens, AuthError> {
        match self.notifier.as_ref() {
            Some(notifier) => self.run_login(notifier).await,
            None => Err(err),
        }
    }
}

#[async_trait]
impl CredentialProvider for GoogleCredentialProvider {
    async fn access_token(&self) -> Result<String, AuthError> {
        let mut cached = self.cached.lock().await;
        if let Some(tokens) = cached.as_ref() {
            if !tokens.is_expiring_soon() {
                return Ok(tokens.access_token.clone());
            }
        }

        let current = match cached.take() {
            Some(tokens) => Some(tokens),
            None => load_tokens(&self.token_path)?,
        };
        let tokens = match current {
            Some(tokens) if !tokens.is_expiring_soon() => tokens,
            Some(tokens) => match self.refresh_and_save(&tokens).await {
                Ok(refreshed) => refreshed,
                Err(AuthError::LoginExpired) => self.login_or(AuthError::LoginExpired).await?,
                Err(err) => return Err(err),
            },
            None => self.login_or(AuthError::NotLoggedIn).await?,
        };
        let access = tokens.access_token.clone();
        *cached = Some(tokens);
        Ok(access)
    }

    async fn refresh(&self) -> Result<String, AuthError> {
        let mut cached = self.cached.lock().await;
        let current = match cached.take() {
            Some(tokens) => tokens,
            None => load_tokens(&self.token_path)?.ok_or(AuthError::NotLoggedIn)?,
        };
        let refreshed = self.refresh_and_save(&current).await?;
        let access = refreshed.access_token.clone();
        *cached = Some(refreshed);
        Ok(access)
    }
}

/// Fixed token, for tests and for callers that manage auth themselves.
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl CredentialProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String, AuthError> {
        Ok(self.token.clone())
    }

    async fn refresh(&self) -> Result<String, AuthError> {
        Ok(self.token.clone())
    }
}

fn shared_auth_http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .timeout(AUTH_HTTP_TIMEOUT)
            .user_agent(concat!("gtasks/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new())
    })
}
