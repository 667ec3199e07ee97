//! Concrete [`TokenExchanger`] against the Twitch OAuth token endpoint.

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;

use crate::error::AuthError;
use crate::provider::TokenExchanger;
use crate::token::AccessToken;

const DEFAULT_TOKEN_URL: &str = "https://id.twitch.tv/oauth2/token";

/// HTTP client for `id.twitch.tv/oauth2/token`.
///
/// # Example
/// ```no_run
/// use twitch_bot_auth::provider::twitch::TwitchTokenClient;
///
/// let client = TwitchTokenClient::new();
/// ```
pub struct TwitchTokenClient {
    client: reqwest::Client,
    token_url: String,
}

impl TwitchTokenClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
        }
    }

    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    async fn request_token(&self, params: &[(&str, &str)]) -> Result<AccessToken, AuthError> {
        let resp = self
            .client
            .post(&self.token_url)
            .header("Accept", "application/json")
            .form(params)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(AuthError::InvalidResponse(format!(
                "token request failed with status {}",
                resp.status()
            )));
        }
        let payload: TwitchTokenResponse = resp
            .json()
            .await
            .map_err(|err| AuthError::InvalidResponse(err.to_string()))?;
        Ok(AccessToken {
            access_token: payload.access_token,
            refresh_token: payload.refresh_token,
            scope: payload.scope,
            expires_in: payload.expires_in,
            obtainment_timestamp: Utc::now().timestamp_millis(),
        })
    }
}

impl Default for TwitchTokenClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenExchanger for TwitchTokenClient {
    async fn exchange_code(
        &self,
        client_id: &str,
        client_secret: &str,
        code: &str,
        redirect_uri: &str,
    ) -> Result<AccessToken, AuthError> {
        self.request_token(&[
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("code", code),
            ("grant_type", "authorization_code"),
            ("redirect_uri", redirect_uri),
        ])
        .await
    }

    async fn refresh_token(
        &self,
        client_id: &str,
        client_secret: &str,
        refresh_token: &str,
    ) -> Result<AccessToken, AuthError> {
        self.request_token(&[
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ])
        .await
    }
}

#[derive(Debug, Deserialize)]
struct TwitchTokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    #[serde(default)]
    scope: Vec<String>,
    expires_in: Option<u64>,
}
