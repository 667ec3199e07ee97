//! Access-token data model.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A structured OAuth access token as returned by the token endpoint.
///
/// Field names serialize camelCase to stay compatible with the tokens file
/// written by earlier versions of the bot. Tokens are immutable once issued;
/// a renewal produces a new value that supersedes this one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessToken {
    pub access_token: String,
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Vec<String>,
    /// Lifetime in seconds at obtainment; `None` for tokens that never
    /// expire (or whose lifetime is unknown).
    pub expires_in: Option<u64>,
    /// Unix milliseconds at which the token was obtained.
    pub obtainment_timestamp: i64,
}

impl AccessToken {
    /// The instant this token expires, if it carries a lifetime.
    ///
    /// `None` for tokens without a lifetime, and for lifetimes so large the
    /// expiry instant is not representable.
    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        let expires_in = i64::try_from(self.expires_in?).ok()?;
        let expires_at = expires_in
            .checked_mul(1000)?
            .checked_add(self.obtainment_timestamp)?;
        Utc.timestamp_millis_opt(expires_at).single()
    }
}

/// The credential the coordinator holds: either a structured token record or
/// an opaque token string (older files stored raw strings).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Credential {
    Token(AccessToken),
    Raw(String),
}

impl Credential {
    /// The bearer token value regardless of representation.
    pub fn access_token(&self) -> &str {
        match self {
            Self::Token(token) => &token.access_token,
            Self::Raw(raw) => raw,
        }
    }

    /// Expiry instant, available only for structured tokens.
    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Token(token) => token.expiry(),
            Self::Raw(_) => None,
        }
    }
}

impl From<AccessToken> for Credential {
    fn from(token: AccessToken) -> Self {
        Self::Token(token)
    }
}

impl From<String> for Credential {
    fn from(raw: String) -> Self {
        Self::Raw(raw)
    }
}
