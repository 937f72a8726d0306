//! Bearer token resolution for API requests.
//!
//! Kept apart from dispatch so token behavior is testable without HTTP.

use crate::auth::CredentialProvider;
use crate::error::ApiError;

/// Resolve the bearer for the next request; `force_refresh` after a 401.
pub(super) async fn resolve_bearer_token(
    credentials: &dyn CredentialProvider,
    force_refresh: bool,
) -> Result<String, ApiError> {
    let token = if force_refresh {
        tracing::debug!("server rejected access token; forcing refresh");
        credentials.refresh().await
    } else {
        credentials.access_token().await
    };
    token.map_err(ApiError::Auth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthError, StaticTokenProvider};
    use async_trait::async_trait;

    struct FailingProvider;

    #[async_trait]
    impl CredentialProvider for FailingProvider {
        async fn access_token(&self) -> Result<String, AuthError> {
            Err(AuthError::NotLoggedIn)
        }
        async fn refresh(&self) -> Result<String, AuthError> {
            Err(AuthError::LoginExpired)
        }
    }

    #[tokio::test]
    async fn static_provider_yields_its_token() {
        let provider = StaticTokenProvider::new("abc");
        assert_eq!(
            resolve_bearer_token(&provider, false).await.expect("token"),
            "abc"
        );
        assert_eq!(
            resolve_bearer_token(&provider, true).await.expect("token"),
            "abc"
        );
    }

    #[tokio::test]
    async fn provider_failures_become_auth_errors() {
        let err = resolve_bearer_token(&FailingProvider, false)
            .await
            .expect_err("fails");
        assert!(matches!(err, ApiError::Auth(AuthError::NotLoggedIn)));
        let err = resolve_bearer_token(&FailingProvider, true)
            .await
            .expect_err("fails");
        assert!(matches!(err, ApiError::Auth(AuthError::LoginExpired)));
    }
}
