//! Process configuration, collected once from the environment.

use std::path::PathBuf;

use crate::error::AuthError;

/// Chat scopes requested for the bot identity.
pub const DEFAULT_SCOPES: &[&str] = &[
    "chat:read",
    "chat:edit",
    "channel:moderate",
    "channel:read:redemptions",
    "channel:read:subscriptions",
    "moderator:read:followers",
];

const DEFAULT_REDIRECT_URI: &str = "http://localhost:3000/auth/callback";

/// Everything the credential coordinator needs to know about the process:
/// client identity, requested scopes, redirect target, the channels the bot
/// joins, and where the tokens file lives.
///
/// Built once at startup via [`BotConfig::from_env`] and passed by value to
/// [`AuthManager::new`](crate::manager::AuthManager::new); nothing else in
/// the crate reads the environment.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub client_id: String,
    pub client_secret: String,
    pub scopes: Vec<String>,
    pub redirect_uri: String,
    /// Channel ids the bot serves. Emptiness gates whether a persisted
    /// credential is auto-loaded at startup.
    pub channel_ids: Vec<String>,
    /// Directory holding `tokens.json`.
    pub tokens_dir: PathBuf,
}

impl BotConfig {
    /// Load configuration from the environment (and a `.env` file, if any).
    ///
    /// `CLIENT_ID` and `CLIENT_SECRET` are required; everything else falls
    /// back to a default. `TWITCH_CHANNELS_ID` is a comma-separated list.
    pub fn from_env() -> Result<Self, AuthError> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error

        let client_id = require_env("CLIENT_ID")?;
        let client_secret = require_env("CLIENT_SECRET")?;

        let channel_ids = std::env::var("TWITCH_CHANNELS_ID")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let redirect_uri = std::env::var("REDIRECT_URI")
            .unwrap_or_else(|_| DEFAULT_REDIRECT_URI.to_string());

        let tokens_dir = std::env::var_os("TOKENS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_tokens_dir);

        Ok(Self {
            client_id,
            client_secret,
            scopes: DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
            redirect_uri,
            channel_ids,
            tokens_dir,
        })
    }
}

fn require_env(name: &str) -> Result<String, AuthError> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AuthError::Config(format!("Environment variable {name} not set")))
}

fn default_tokens_dir() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join(".twitch-bot"))
        .unwrap_or_else(|| PathBuf::from(".twitch-bot"))
}
