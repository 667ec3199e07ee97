//! The credential coordinator.

use std::sync::{Arc, RwLock, Weak};

use crate::config::BotConfig;
use crate::error::{AuthError, StoreError};
use crate::provider::{RefreshingAuthProvider, TokenExchanger};
use crate::status::{Service, ServiceStatus, ServiceStatusMap};
use crate::store::{CredentialStore, TokensFile};
use crate::token::{AccessToken, Credential};

/// Coordinates the credential lifecycle for the process: holds the pending
/// authorization code, the in-memory current credential and the per-service
/// statuses, and funnels every credential change through the rotation logic
/// that keeps `tokens.json` consistent.
///
/// Constructed once at process start and passed around as a cheap [`Clone`]
/// handle; all handles share the same state. On construction, a persisted
/// credential is loaded back into memory, but only when at least one channel
/// id is configured.
#[derive(Clone)]
pub struct AuthManager {
    inner: Arc<ManagerInner>,
}

struct ManagerInner {
    config: BotConfig,
    store: Arc<dyn CredentialStore>,
    exchanger: Arc<dyn TokenExchanger>,
    state: RwLock<ManagerState>,
    provider: RwLock<Option<Arc<RefreshingAuthProvider>>>,
}

#[derive(Default)]
struct ManagerState {
    code: Option<String>,
    credential: Option<Credential>,
    statuses: ServiceStatusMap,
}

impl AuthManager {
    pub fn new(
        config: BotConfig,
        store: Arc<dyn CredentialStore>,
        exchanger: Arc<dyn TokenExchanger>,
    ) -> Self {
        let manager = Self {
            inner: Arc::new(ManagerInner {
                config,
                store,
                exchanger,
                state: RwLock::new(ManagerState::default()),
                provider: RwLock::new(None),
            }),
        };
        manager.load_persisted();
        manager
    }

    /// Load the persisted current credential into memory, gated on a minimal
    /// channel-identity configuration. A missing file is normal; anything
    /// else unreadable is logged and skipped.
    fn load_persisted(&self) {
        if !self.inner.store.exists() {
            return;
        }
        if self.inner.config.channel_ids.is_empty() {
            tracing::debug!("no channel ids configured, skipping persisted token load");
            return;
        }
        match self.inner.store.read() {
            Ok(file) => {
                if let Some(current) = file.current {
                    // came from the file, no need to write it back
                    self.set_credential(current, false);
                }
            }
            Err(StoreError::NotFound) => {}
            Err(err) => {
                tracing::warn!(error = %err, "could not load persisted tokens file");
            }
        }
    }

    /// Store the authorization code for the next exchange attempt. The code
    /// format is not validated.
    pub fn set_code(&self, code: String) {
        self.inner.state.write().unwrap().code = Some(code);
    }

    pub fn code(&self) -> Option<String> {
        self.inner.state.read().unwrap().code.clone()
    }

    /// Exchange the pending authorization code for an access token.
    ///
    /// Fails with [`AuthError::MissingCode`] when no code has been set, and
    /// surfaces capability failures as [`AuthError::ExchangeFailed`] result
    /// values so the login route can render them. The new token is returned,
    /// not persisted; call [`set_credential`](Self::set_credential) for that.
    pub async fn exchange_code(
        &self,
        client_id: &str,
        client_secret: &str,
    ) -> Result<AccessToken, AuthError> {
        let code = self.code().ok_or(AuthError::MissingCode)?;
        self.inner
            .exchanger
            .exchange_code(
                client_id,
                client_secret,
                &code,
                &self.inner.config.redirect_uri,
            )
            .await
            .map_err(|err| match err {
                AuthError::ExchangeFailed(_) => err,
                other => AuthError::ExchangeFailed(other.to_string()),
            })
    }

    /// Make `credential` the current one.
    ///
    /// With `persist`, the existing history is read (or started fresh), the
    /// old `current` moves to the end of `previous`, and the file is written
    /// back. Storage trouble along the way is logged and never blocks the
    /// in-memory update, which always happens last.
    pub fn set_credential(&self, credential: Credential, persist: bool) {
        if persist {
            let mut history = match self.inner.store.read() {
                Ok(history) => history,
                Err(StoreError::NotFound) => TokensFile::default(),
                Err(err) => {
                    tracing::error!(error = %err, "could not read tokens file, starting a fresh history");
                    TokensFile::default()
                }
            };
            if let Some(superseded) = history.current.take() {
                history.previous.push(superseded);
            }
            history.current = Some(credential.clone());
            if let Err(err) = self.inner.store.write(&history) {
                tracing::error!(error = %err, "could not persist tokens file");
            }
        }

        if let Some(expiry) = credential.expiry() {
            tracing::info!(
                "new access token is valid until {}",
                expiry.format("%d.%m.%y %H:%M:%S")
            );
        }

        let replaced = {
            let mut state = self.inner.state.write().unwrap();
            state.credential.replace(credential).is_some()
        };
        tracing::debug!(replaced, "in-memory access token updated");
    }

    pub fn credential(&self) -> Option<Credential> {
        self.inner.state.read().unwrap().credential.clone()
    }

    pub fn scopes(&self) -> Vec<String> {
        self.inner.config.scopes.clone()
    }

    pub fn statuses(&self) -> ServiceStatusMap {
        self.inner.state.read().unwrap().statuses.clone()
    }

    pub fn set_statuses(&self, statuses: ServiceStatusMap) {
        self.inner.state.write().unwrap().statuses = statuses;
    }

    pub fn status(&self, service: Service) -> ServiceStatus {
        self.inner.state.read().unwrap().statuses.get(service).clone()
    }

    /// Update one service's status without touching the other's.
    pub fn update_status(&self, service: Service, status: ServiceStatus) {
        self.inner
            .state
            .write()
            .unwrap()
            .statuses
            .set(service, status);
    }

    /// The auto-refreshing provider for this process, built lazily on first
    /// access and identical on every later call until replaced via
    /// [`set_auth_provider`](Self::set_auth_provider).
    ///
    /// Renewals reported by the provider re-enter [`set_credential`] with
    /// persistence enabled; renewal failures are logged only.
    pub fn auth_provider(&self) -> Arc<RefreshingAuthProvider> {
        if let Some(existing) = self.inner.provider.read().unwrap().as_ref() {
            return Arc::clone(existing);
        }

        let mut slot = self.inner.provider.write().unwrap();
        if let Some(existing) = slot.as_ref() {
            return Arc::clone(existing);
        }

        let provider = Arc::new(RefreshingAuthProvider::new(
            Arc::clone(&self.inner.exchanger),
            self.inner.config.client_id.clone(),
            self.inner.config.client_secret.clone(),
            self.inner.config.scopes.clone(),
            self.inner.config.redirect_uri.clone(),
        ));

        // The manager owns the provider, so the listeners hold a weak handle
        // back to avoid an Arc cycle.
        let on_refresh: Weak<ManagerInner> = Arc::downgrade(&self.inner);
        provider.on_refresh(move |user_id, token| {
            tracing::info!(user_id = %user_id, "access token was refreshed");
            if let Some(inner) = on_refresh.upgrade() {
                AuthManager { inner }.set_credential(Credential::Token(token.clone()), true);
            }
        });
        provider.on_refresh_failure(move |user_id| {
            tracing::warn!(user_id = %user_id, "could not refresh the access token");
        });

        *slot = Some(Arc::clone(&provider));
        provider
    }

    /// Replace the provider wholesale (test injection).
    pub fn set_auth_provider(&self, provider: Arc<RefreshingAuthProvider>) {
        *self.inner.provider.write().unwrap() = Some(provider);
    }
}
