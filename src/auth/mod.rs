//! Google OAuth login and local token persistence.
//!
//! Tokens are saved as owner-only JSON under `~/.config/gtasks/token.json`
//! and refreshed shortly before they expire. The remote client only sees the
//! [`CredentialProvider`] trait.

mod browser;
mod error;
mod flows;
mod oauth;
mod provider;
mod secrets;
mod store;
mod types;

pub use browser::try_open_browser;
pub use error::AuthError;
pub use flows::{authorize, LoginStep};
pub use provider::{
    CredentialProvider, GoogleCredentialProvider, LoginNotifier, StaticTokenProvider,
};
pub use secrets::load_client_secrets;
pub use store::{load_tokens, reset_tokens, save_tokens, token_health};
pub use types::{ClientSecrets, OAuthTokens, TokenHealth, TASKS_SCOPE};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::types::unix_now_secs;

    #[test]
    fn token_expiry_guard_triggers_near_expiration() {
        let now = unix_now_secs();
        let almost_expired = OAuthTokens {
            access_token: "a".into(),
            refresh_token: "b".into(),
            expires_at_unix: now + 30,
        };
        assert!(almost_expired.is_expiring_soon());
        let healthy = OAuthTokens {
            access_token: "a".into(),
            refresh_token: "b".into(),
            expires_at_unix: now + 600,
        };
        assert!(!healthy.is_expiring_soon());
    }
}
