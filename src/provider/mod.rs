//! The token-exchange capability and the auto-refreshing adapter around it.

pub mod twitch;

use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::AuthError;
use crate::token::AccessToken;

/// Renew this long before the token's expiry instant.
const RENEWAL_MARGIN: Duration = Duration::from_secs(60);
/// Never schedule a renewal sooner than this.
const MIN_RENEWAL_DELAY: Duration = Duration::from_secs(5);
/// Renewal interval for tokens that carry no lifetime.
const DEFAULT_RENEWAL_DELAY: Duration = Duration::from_secs(3600);

/// The external OAuth capability: exchanging an authorization code and
/// refreshing a token over the network.
///
/// The coordinator only ever depends on this trait; the concrete client
/// lives in [`twitch`] and tests substitute a scripted fake.
#[async_trait]
pub trait TokenExchanger: Send + Sync {
    async fn exchange_code(
        &self,
        client_id: &str,
        client_secret: &str,
        code: &str,
        redirect_uri: &str,
    ) -> Result<AccessToken, AuthError>;

    async fn refresh_token(
        &self,
        client_id: &str,
        client_secret: &str,
        refresh_token: &str,
    ) -> Result<AccessToken, AuthError>;
}

type RefreshListener = Box<dyn Fn(&str, &AccessToken) + Send + Sync>;
type RefreshFailureListener = Box<dyn Fn(&str) + Send + Sync>;

/// Wraps a [`TokenExchanger`] with the client identity, implied scopes and
/// redirect target, and notifies registered listeners whenever a renewal
/// succeeds or fails.
///
/// Renewal failures are reported to listeners and otherwise left alone:
/// no retry happens here.
pub struct RefreshingAuthProvider {
    exchanger: Arc<dyn TokenExchanger>,
    client_id: String,
    client_secret: String,
    scopes: Vec<String>,
    redirect_uri: String,
    refresh_listeners: RwLock<Vec<RefreshListener>>,
    failure_listeners: RwLock<Vec<RefreshFailureListener>>,
}

impl RefreshingAuthProvider {
    pub fn new(
        exchanger: Arc<dyn TokenExchanger>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        scopes: Vec<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            exchanger,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            scopes,
            redirect_uri: redirect_uri.into(),
            refresh_listeners: RwLock::new(Vec::new()),
            failure_listeners: RwLock::new(Vec::new()),
        }
    }

    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    /// Register a listener invoked with `(user_id, new_token)` after every
    /// successful renewal.
    pub fn on_refresh(&self, listener: impl Fn(&str, &AccessToken) + Send + Sync + 'static) {
        self.refresh_listeners
            .write()
            .unwrap()
            .push(Box::new(listener));
    }

    /// Register a listener invoked with the user id after a failed renewal.
    pub fn on_refresh_failure(&self, listener: impl Fn(&str) + Send + Sync + 'static) {
        self.failure_listeners
            .write()
            .unwrap()
            .push(Box::new(listener));
    }

    /// Exchange an authorization code using the configured identity.
    pub async fn exchange_code(&self, code: &str) -> Result<AccessToken, AuthError> {
        self.exchanger
            .exchange_code(&self.client_id, &self.client_secret, code, &self.redirect_uri)
            .await
    }

    /// Refresh once and notify the matching listeners with the outcome.
    pub async fn refresh(
        &self,
        user_id: &str,
        refresh_token: &str,
    ) -> Result<AccessToken, AuthError> {
        match self
            .exchanger
            .refresh_token(&self.client_id, &self.client_secret, refresh_token)
            .await
        {
            Ok(token) => {
                for listener in self.refresh_listeners.read().unwrap().iter() {
                    listener(user_id, &token);
                }
                Ok(token)
            }
            Err(err) => {
                for listener in self.failure_listeners.read().unwrap().iter() {
                    listener(user_id);
                }
                Err(err)
            }
        }
    }

    /// Spawn a background task that keeps `initial` renewed until the chain
    /// breaks: it sleeps until shortly before expiry, refreshes, and repeats
    /// with the renewed token. Stops when a token has no refresh token or a
    /// renewal fails (the failure has already been reported to listeners).
    pub fn start_auto_renewal(
        self: &Arc<Self>,
        user_id: impl Into<String>,
        initial: AccessToken,
    ) -> tokio::task::JoinHandle<()> {
        let provider = Arc::clone(self);
        let user_id = user_id.into();
        tokio::spawn(async move {
            let mut token = initial;
            loop {
                let Some(refresh_token) = token.refresh_token.clone() else {
                    tracing::debug!(user_id = %user_id, "token has no refresh token, auto-renewal stopped");
                    return;
                };
                tokio::time::sleep(renewal_delay(&token, Utc::now())).await;
                match provider.refresh(&user_id, &refresh_token).await {
                    Ok(renewed) => token = renewed,
                    Err(err) => {
                        tracing::warn!(user_id = %user_id, error = %err, "auto-renewal stopped after failed refresh");
                        return;
                    }
                }
            }
        })
    }
}

/// How long to wait before renewing `token`, measured from `now`.
fn renewal_delay(token: &AccessToken, now: DateTime<Utc>) -> Duration {
    let Some(expiry) = token.expiry() else {
        return DEFAULT_RENEWAL_DELAY;
    };
    let until_expiry = (expiry - now)
        .to_std()
        .unwrap_or(Duration::ZERO)
        .saturating_sub(RENEWAL_MARGIN);
    until_expiry.max(MIN_RENEWAL_DELAY)
}
