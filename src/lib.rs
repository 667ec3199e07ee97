//! twitch-bot-auth — access-token lifecycle for a Twitch chat bot.
//!
//! Manages a single Twitch identity's OAuth credential for a long-running
//! bot process and its EventSub listener: capturing the authorization code,
//! exchanging it for an access token, persisting the current token plus a
//! rotation history to `tokens.json`, auto-refreshing before expiry, and
//! tracking the running status of the services that consume the token.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use twitch_bot_auth::config::BotConfig;
//! use twitch_bot_auth::manager::AuthManager;
//! use twitch_bot_auth::provider::twitch::TwitchTokenClient;
//! use twitch_bot_auth::store::FileTokenStore;
//!
//! # async fn example() -> Result<(), twitch_bot_auth::error::AuthError> {
//! let config = BotConfig::from_env()?;
//! let store = Arc::new(FileTokenStore::new(config.tokens_dir.clone()));
//! let manager = AuthManager::new(config.clone(), store, Arc::new(TwitchTokenClient::new()));
//!
//! manager.set_code("code-from-login-redirect".to_string());
//! let token = manager
//!     .exchange_code(&config.client_id, &config.client_secret)
//!     .await?;
//! manager.set_credential(token.into(), true);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod manager;
pub mod provider;
pub mod status;
pub mod store;
pub mod token;

pub use config::BotConfig;
pub use error::{AuthError, StoreError};
pub use manager::AuthManager;
pub use provider::{RefreshingAuthProvider, TokenExchanger};
pub use status::{Service, ServiceRunningStatus, ServiceStatus, ServiceStatusMap};
pub use store::{CredentialStore, FileTokenStore, TokensFile};
pub use token::{AccessToken, Credential};
