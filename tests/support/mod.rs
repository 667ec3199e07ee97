#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use twitch_bot_auth::config::BotConfig;
use twitch_bot_auth::error::{AuthError, StoreError};
use twitch_bot_auth::provider::TokenExchanger;
use twitch_bot_auth::store::{CredentialStore, TokensFile};
use twitch_bot_auth::token::AccessToken;

pub fn test_config(tokens_dir: std::path::PathBuf) -> BotConfig {
    BotConfig {
        client_id: "client-id".to_string(),
        client_secret: "client-secret".to_string(),
        scopes: vec!["chat:read".to_string(), "chat:edit".to_string()],
        redirect_uri: "http://localhost:3000/auth/callback".to_string(),
        channel_ids: vec!["12345".to_string()],
        tokens_dir,
    }
}

pub fn access_token(access: &str, refresh: Option<&str>, expires_in: Option<u64>) -> AccessToken {
    AccessToken {
        access_token: access.to_string(),
        refresh_token: refresh.map(str::to_string),
        scope: vec!["chat:read".to_string()],
        expires_in,
        obtainment_timestamp: Utc::now().timestamp_millis(),
    }
}

/// Store whose writes always fail; reads behave like an empty store.
#[derive(Default)]
pub struct FailingStore {
    pub write_attempts: AtomicUsize,
}

impl CredentialStore for FailingStore {
    fn exists(&self) -> bool {
        false
    }

    fn read(&self) -> Result<TokensFile, StoreError> {
        Err(StoreError::NotFound)
    }

    fn write(&self, _history: &TokensFile) -> Result<(), StoreError> {
        self.write_attempts.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Io("disk full".to_string()))
    }
}

/// Exchanger answering from a scripted queue of results, recording calls.
#[derive(Default)]
pub struct FakeExchanger {
    results: Mutex<VecDeque<Result<AccessToken, AuthError>>>,
    pub exchange_calls: AtomicUsize,
    pub refresh_calls: AtomicUsize,
}

impl FakeExchanger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_ok(&self, token: AccessToken) {
        self.results.lock().unwrap().push_back(Ok(token));
    }

    pub fn push_err(&self, message: &str) {
        self.results
            .lock()
            .unwrap()
            .push_back(Err(AuthError::ExchangeFailed(message.to_string())));
    }

    fn next(&self) -> Result<AccessToken, AuthError> {
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AuthError::ExchangeFailed("script exhausted".to_string())))
    }
}

#[async_trait]
impl TokenExchanger for FakeExchanger {
    async fn exchange_code(
        &self,
        _client_id: &str,
        _client_secret: &str,
        _code: &str,
        _redirect_uri: &str,
    ) -> Result<AccessToken, AuthError> {
        self.exchange_calls.fetch_add(1, Ordering::SeqCst);
        self.next()
    }

    async fn refresh_token(
        &self,
        _client_id: &str,
        _client_secret: &str,
        _refresh_token: &str,
    ) -> Result<AccessToken, AuthError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        self.next()
    }
}
