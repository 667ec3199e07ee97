//! Error types for the credential lifecycle.

use thiserror::Error;

/// Errors surfaced by the coordinator and the exchange capability.
///
/// Exchange failures are returned as values so the login route can render a
/// user-facing message; they are never panics. Storage trouble during a
/// best-effort persist is logged and downgraded rather than propagated.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("No authorization code set; visit /login to obtain one")]
    MissingCode,
    #[error("Could not exchange the authorization code for an access token: {0}")]
    ExchangeFailed(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// Outcome of a failed tokens-file access, kept distinct so callers can tell
/// "no file yet" from "file present but unusable".
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("tokens file not found")]
    NotFound,
    #[error("tokens file could not be parsed: {0}")]
    Parse(String),
    #[error("IO error: {0}")]
    Io(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(error.to_string())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound,
            _ => Self::Io(error.to_string()),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(error: serde_json::Error) -> Self {
        Self::Parse(error.to_string())
    }
}
