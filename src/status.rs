//! Running status of the services that consume the credential.

use serde::{Deserialize, Serialize};

/// The two services that depend on the access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    Bot,
    EventListener,
}

impl Service {
    /// Wire name used in status payloads (`bot` / `eventListener`).
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bot => "bot",
            Self::EventListener => "eventListener",
        }
    }
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a service is (not) running. No transition rules are enforced here;
/// the bot and listener pick their own transitions (for example moving to
/// `StoppedNoAccessToken` when they find no credential at startup).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceRunningStatus {
    Running,
    Stopped,
    StoppedNoAccessToken,
    StoppedInvalidAccessToken,
}

/// Status plus an optional human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub status: ServiceRunningStatus,
    pub reason: Option<String>,
}

impl ServiceStatus {
    pub fn new(status: ServiceRunningStatus) -> Self {
        Self {
            status,
            reason: None,
        }
    }

    pub fn with_reason(status: ServiceRunningStatus, reason: impl Into<String>) -> Self {
        Self {
            status,
            reason: Some(reason.into()),
        }
    }
}

impl Default for ServiceStatus {
    fn default() -> Self {
        Self::new(ServiceRunningStatus::Stopped)
    }
}

/// One independently settable status per service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatusMap {
    pub bot: ServiceStatus,
    #[serde(rename = "eventListener")]
    pub event_listener: ServiceStatus,
}

impl ServiceStatusMap {
    pub fn get(&self, service: Service) -> &ServiceStatus {
        match service {
            Service::Bot => &self.bot,
            Service::EventListener => &self.event_listener,
        }
    }

    pub fn set(&mut self, service: Service, status: ServiceStatus) {
        match service {
            Service::Bot => self.bot = status,
            Service::EventListener => self.event_listener = status,
        }
    }
}
