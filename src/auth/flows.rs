//! Authorization-code capture: loopback redirect server and pasted redirects.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use super::browser;
use super::error::AuthError;
use super::oauth::{self, PkceSession};
use super::types::{ClientSecrets, OAuthTokens};
use crate::config::AuthFlow;

/// How long the loopback server waits for the browser redirect.
const REDIRECT_TIMEOUT: Duration = Duration::from_secs(300);
/// Redirect target for the manual flow; the browser fails to load it and the
/// user copies the address bar back into the terminal.
const MANUAL_REDIRECT_URI: &str = "http://localhost";
const MAX_REQUEST_HEAD_BYTES: usize = 8192;

const SUCCESS_PAGE: &str = "<html><body><h2>gtasks: authorization complete.</h2><p>You can close this window and return to the terminal.</p></body></html>";
const FAILURE_PAGE: &str = "<html><body><h2>gtasks: authorization failed.</h2><p>Return to the terminal for details.</p></body></html>";

/// Progress surfaced to the caller while a login flow runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginStep<'a> {
    /// Waiting for the browser to hit the loopback redirect.
    WaitingForRedirect { url: &'a str, browser_opened: bool },
    /// The user must open `url` and paste the final address (or code) back.
    PasteRequired { url: &'a str },
}

/// Run the configured authorization flow and exchange the resulting code.
pub async fn authorize(
    http: &reqwest::Client,
    secrets: &ClientSecrets,
    flow: AuthFlow,
    redirect_port: u16,
    notify: &(dyn Fn(LoginStep<'_>) + Send + Sync),
) -> Result<OAuthTokens, AuthError> {
    let pkce = PkceSession::generate();
    let (code, redirect_uri) = match flow {
        AuthFlow::Manual => {
            let url = oauth::authorization_url(secrets, MANUAL_REDIRECT_URI, &pkce)?;
            notify(LoginStep::PasteRequired { url: &url });
            let pasted = read_pasted_line().await?;
            (
                parse_pasted_response(&pasted, &pkce.state)?,
                MANUAL_REDIRECT_URI.to_string(),
            )
        }
        AuthFlow::Auto | AuthFlow::Carbonyl => {
            let server = LoopbackServer::bind(redirect_port).await?;
            let url = oauth::authorization_url(secrets, server.redirect_uri(), &pkce)?;
            let redirect_uri = server.redirect_uri().to_string();
            // Held until the code arrives; dropping it kills carbonyl.
            let mut _carbonyl = None;
            let browser_opened = if flow == AuthFlow::Carbonyl {
                match browser::spawn_carbonyl(&url) {
                    Ok(child) => {
                        _carbonyl = Some(child);
                        true
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "failed to launch carbonyl");
                        false
                    }
                }
            } else {
                browser::try_open_browser(&url)
            };
            notify(LoginStep::WaitingForRedirect {
                url: &url,
                browser_opened,
            });
            let code = server.wait_for_code(&pkce.state, REDIRECT_TIMEOUT).await?;
            (code, redirect_uri)
        }
    };
    tracing::debug!(flow = flow.as_str(), "exchanging authorization code");
    oauth::exchange_code(http, secrets, &code, &redirect_uri, &pkce.verifier).await
}

/// One-shot HTTP listener on 127.0.0.1 that captures the OAuth redirect.
pub(crate) struct LoopbackServer {
    listener: TcpListener,
    redirect_uri: String,
}

impl LoopbackServer {
    /// Bind the loopback listener; port `0` picks a free port.
    pub(crate) async fn bind(port: u16) -> Result<Self, AuthError> {
        let listener = TcpListener::bind(("127.0.0.1", port)).await?;
        let addr = listener.local_addr()?;
        Ok(Self {
            listener,
            redirect_uri: format!("http://127.0.0.1:{}", addr.port()),
        })
    }

    pub(crate) fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    /// Serve requests until one carries `code` or `error`.
    pub(crate) async fn wait_for_code(
        self,
        expected_state: &str,
        timeout: Duration,
    ) -> Result<String, AuthError> {
        tokio::time::timeout(timeout, self.accept_until_redirect(expected_state))
            .await
            .map_err(|_| AuthError::TimedOut)?
    }

    async fn accept_until_redirect(&self, expected_state: &str) -> Result<String, AuthError> {
        loop {
            let (mut stream, peer) = self.listener.accept().await?;
            let target = match read_request_target(&mut stream).await {
                Ok(Some(target)) => target,
                Ok(None) => {
                    respond(&mut stream, "400 Bad Request", FAILURE_PAGE).await;
                    continue;
                }
                Err(err) => {
                    tracing::debug!(%peer, error = %err, "dropped loopback connection");
                    continue;
                }
            };
            match redirect_outcome(&target, expected_state) {
                // Browsers also ask for /favicon.ico and similar; ignore those.
                None => respond(&mut stream, "404 Not Found", "").await,
                Some(Ok(code)) => {
                    respond(&mut stream, "200 OK", SUCCESS_PAGE).await;
                    return Ok(code);
                }
                Some(Err(err)) => {
                    respond(&mut stream, "400 Bad Request", FAILURE_PAGE).await;
                    return Err(err);
                }
            }
        }
    }
}

/// Read the request head and return the request-target of a GET.
async fn read_request_target(stream: &mut TcpStream) -> std::io::Result<Option<String>> {
    let mut buf = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|window| window == b"\r\n\r\n") {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.len() > MAX_REQUEST_HEAD_BYTES {
            return Ok(None);
        }
    }
    let head = String::from_utf8_lossy(&buf);
    let mut parts = head.lines().next().unwrap_or_default().split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("GET"), Some(target)) => Ok(Some(target.to_string())),
        _ => Ok(None),
    }
}

async fn respond(stream: &mut TcpStream, status: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

/// Interpret a redirect request-target; `None` means "not the redirect".
fn redirect_outcome(target: &str, expected_state: &str) -> Option<Result<String, AuthError>> {
    let url = reqwest::Url::parse(&format!("http://127.0.0.1{target}")).ok()?;
    code_from_query(&url, expected_state)
}

fn code_from_query(url: &reqwest::Url, expected_state: &str) -> Option<Result<String, AuthError>> {
    let mut code = None;
    let mut state = None;
    let mut error = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            _ => {}
        }
    }
    if let Some(error) = error {
        return Some(Err(AuthError::Denied(error)));
    }
    let code = code?;
    if state.as_deref() != Some(expected_state) {
        return Some(Err(AuthError::Invalid(
            "authorization redirect state did not match; start the login again".to_string(),
        )));
    }
    Some(Ok(code))
}

/// Accept either the full redirect URL from the address bar or the bare code.
pub(crate) fn parse_pasted_response(
    input: &str,
    expected_state: &str,
) -> Result<String, AuthError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AuthError::Invalid(
            "no authorization code was entered".to_string(),
        ));
    }
    if trimmed.contains("code=") || trimmed.contains("error=") {
        let url = if trimmed.contains("://") {
            reqwest::Url::parse(trimmed)
        } else {
            reqwest::Url::parse(&format!(
                "http://localhost/?{}",
                trimmed.trim_start_matches(['/', '?'])
            ))
        }
        .map_err(|err| AuthError::Invalid(format!("could not parse pasted URL: {err}")))?;
        return code_from_query(&url, expected_state).unwrap_or_else(|| {
            Err(AuthError::Invalid(
                "pasted URL did not contain an authorization code".to_string(),
            ))
        });
    }
    Ok(trimmed.to_string())
}

async fn read_pasted_line() -> Result<String, AuthError> {
    tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        std::io::stdin().read_line(&mut line).map(|_| line)
    })
    .await
    .map_err(|err| AuthError::Invalid(format!("stdin reader failed: {err}")))?
    .map_err(AuthError::Io)
}
