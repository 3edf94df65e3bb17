//! Bearer-token providers for the backup store.
//!
//! Two modes exist. `Silent` must never involve the user and is the only mode
//! the sync driver uses on its own; `Interactive` is reserved for an explicit
//! sign-in action.

use async_trait::async_trait;
use log::info;
use reqwest::Client;
use serde::Deserialize;

pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const DEFAULT_EXPIRES_IN_SECS: u64 = 3600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Silent,
    Interactive { force_prompt: bool },
}

/// A freshly issued access token
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
}

fn default_expires_in() -> u64 {
    DEFAULT_EXPIRES_IN_SECS
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("No authorization flow is configured")]
    NotConfigured,
    #[error("Authorization requires user interaction")]
    InteractionRequired,
    #[error("Token endpoint returned {0}: {1}")]
    Rejected(u16, String),
    #[error("Token request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn acquire_token(&self, mode: AuthMode) -> Result<TokenGrant, AuthError>;
}

/// Used when no credentials are configured; tokens can still be handed over
/// from outside through `SyncService::set_token`.
#[derive(Debug, Clone, Default)]
pub struct UnconfiguredAuth;

#[async_trait]
impl AuthProvider for UnconfiguredAuth {
    async fn acquire_token(&self, _mode: AuthMode) -> Result<TokenGrant, AuthError> {
        Err(AuthError::NotConfigured)
    }
}

/// Exchanges a long-lived OAuth refresh token for access tokens.
///
/// Headless: there is no consent screen to show, so both modes perform the
/// same exchange.
#[derive(Clone)]
pub struct OAuthRefreshProvider {
    client: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    refresh_token: String,
}

impl OAuthRefreshProvider {
    pub fn new(client: Client, client_id: String, client_secret: String, refresh_token: String) -> Self {
        Self {
            client,
            token_url: GOOGLE_TOKEN_URL.to_string(),
            client_id,
            client_secret,
            refresh_token,
        }
    }

    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }
}

#[async_trait]
impl AuthProvider for OAuthRefreshProvider {
    async fn acquire_token(&self, mode: AuthMode) -> Result<TokenGrant, AuthError> {
        if let AuthMode::Interactive { force_prompt: true } = mode {
            info!("Consent prompt requested; refresh-token flow has no prompt, exchanging directly");
        }

        let response = self
            .client
            .post(&self.token_url)
            .form(&[
                ("grant_type", "refresh_token"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", self.refresh_token.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Rejected(status.as_u16(), body));
        }

        let grant: TokenGrant = response.json().await?;
        info!("Obtained access token valid for {}s", grant.expires_in);
        Ok(grant)
    }
}
