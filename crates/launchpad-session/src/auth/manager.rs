/*
[INPUT]:  Principal, optional nonce, HTTP client, nonce source and session store
[OUTPUT]: Bearer token for the chain identity plus the live session record
[POS]:    Auth layer - orchestrates verify / refresh / login fallbacks
[UPDATE]: When auth endpoints, fallback order or persistence rules change
*/

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};

use crate::http::{LaunchpadClient, Result, SessionError};
use crate::store::SessionStore;
use crate::types::{Chain, Session, SessionStatus};

use super::NonceSource;

/// Which step of the connect flow produced the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectPath {
    /// Stored token was still accepted
    Verified,
    /// Stored token was traded for a new one
    Refreshed,
    /// Fresh principal + nonce login
    LoggedIn,
    /// Another caller finished connecting while this one waited
    Joined,
}

/// Successful outcome of `SessionManager::connect`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connected {
    pub token: String,
    pub via: ConnectPath,
}

/// Session token manager for one chain identity.
///
/// Cloning is cheap; clones share the same session.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<Inner>,
}

struct Inner {
    chain: Chain,
    client: LaunchpadClient,
    nonce_source: Arc<dyn NonceSource>,
    store: Arc<dyn SessionStore>,
    state: watch::Sender<Session>,
    connect_gate: Mutex<()>,
    // Bumped after every successful connect.
    epoch: AtomicU64,
    // Bumped by disconnect/forget; in-flight results from an older
    // generation are dropped.
    generation: AtomicU64,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("chain", &self.inner.chain)
            .field("base_url", &self.inner.client.base_url().as_str())
            .field("status", &self.status())
            .finish()
    }
}

impl SessionManager {
    /// Create a manager holding an empty session
    pub fn new(
        chain: Chain,
        client: LaunchpadClient,
        nonce_source: Arc<dyn NonceSource>,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        let (state, _) = watch::channel(Session::default());
        Self {
            inner: Arc::new(Inner {
                chain,
                client,
                nonce_source,
                store,
                state,
                connect_gate: Mutex::new(()),
                epoch: AtomicU64::new(0),
                generation: AtomicU64::new(0),
            }),
        }
    }

    pub fn chain(&self) -> Chain {
        self.inner.chain
    }

    pub fn client(&self) -> &LaunchpadClient {
        &self.inner.client
    }

    /// Copy of the current session
    pub fn snapshot(&self) -> Session {
        self.inner.state.borrow().clone()
    }

    pub fn status(&self) -> SessionStatus {
        self.inner.state.borrow().status()
    }

    /// Current bearer token, if authenticated
    pub fn token(&self) -> Option<String> {
        let session = self.inner.state.borrow();
        session.has_token().then(|| session.token.clone())
    }

    /// Watch session changes (UI bindings, tests)
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.inner.state.subscribe()
    }

    /// Load the persisted session, replacing the in-memory one
    pub async fn restore(&self) -> Result<SessionStatus> {
        let restored = self
            .inner
            .store
            .load(self.chain())
            .await?
            .map(Session::normalized)
            .unwrap_or_default();
        let status = restored.status();
        self.inner.state.send_replace(restored);
        debug!(chain = %self.chain(), ?status, "session restored");
        Ok(status)
    }

    /// Obtain a bearer token for `principal`.
    ///
    /// 1. A stored token that still verifies is returned as-is.
    /// 2. Otherwise the stored token is refreshed.
    /// 3. Otherwise a full login runs with `nonce`, or one from the nonce source.
    ///
    /// Verification and refresh failures fall through to the next step. Only a
    /// missing nonce, a failed login, or a `disconnect` racing the flow is
    /// returned as an error.
    ///
    /// The profile is reloaded in a background task afterwards.
    pub async fn connect(&self, principal: &str, nonce: Option<&str>) -> Result<Connected> {
        let connected = self.connect_gated(principal, nonce).await?;
        if connected.via != ConnectPath::Joined {
            let manager = self.clone();
            tokio::spawn(async move {
                manager.reload_profile().await;
            });
        }
        Ok(connected)
    }

    /// Like `connect`, but reloads the profile before returning.
    pub async fn connect_with_profile(
        &self,
        principal: &str,
        nonce: Option<&str>,
    ) -> Result<Connected> {
        let connected = self.connect_gated(principal, nonce).await?;
        self.reload_profile().await;
        Ok(connected)
    }

    async fn connect_gated(&self, principal: &str, nonce: Option<&str>) -> Result<Connected> {
        let principal = principal.trim();
        if principal.is_empty() {
            return Err(SessionError::Config(
                "a principal is required to connect".to_string(),
            ));
        }

        let observed = self.inner.epoch.load(Ordering::Acquire);
        let _gate = self.inner.connect_gate.lock().await;

        if self.inner.epoch.load(Ordering::Acquire) != observed {
            let session = self.snapshot();
            if session.is_authenticated() && session.principal.as_deref() == Some(principal) {
                debug!(chain = %self.chain(), principal, "joined concurrent connect");
                return Ok(Connected {
                    token: session.token,
                    via: ConnectPath::Joined,
                });
            }
        }

        let connected = self.connect_locked(principal, nonce).await?;
        self.inner.epoch.fetch_add(1, Ordering::AcqRel);
        info!(chain = %self.chain(), principal, via = ?connected.via, "session connected");

        Ok(connected)
    }

    async fn connect_locked(&self, principal: &str, nonce: Option<&str>) -> Result<Connected> {
        let generation = self.generation();
        let current = self.snapshot();

        if current.has_token() {
            if current.principal.as_deref() == Some(principal) {
                let token = current.token.clone();
                if self.check_login(&token).await {
                    self.ensure_generation(generation)?;
                    if !current.is_authenticated() {
                        self.apply_if_current(generation, |s| s.authenticate(principal, token.clone()));
                        self.persist().await;
                    }
                    return Ok(Connected {
                        token,
                        via: ConnectPath::Verified,
                    });
                }
                self.ensure_generation(generation)?;

                match self.refresh_in(generation, &token).await {
                    Ok(token) => {
                        return Ok(Connected {
                            token,
                            via: ConnectPath::Refreshed,
                        });
                    }
                    Err(err) => {
                        self.ensure_generation(generation)?;
                        debug!(chain = %self.chain(), error = %err, "refresh failed, falling back to login");
                    }
                }
            } else {
                info!(chain = %self.chain(), principal, "stored token belongs to another principal");
                self.inner.state.send_modify(Session::clear_auth);
                self.persist().await;
            }
        }

        let token = self.login(generation, principal, nonce).await?;
        Ok(Connected {
            token,
            via: ConnectPath::LoggedIn,
        })
    }

    async fn login(&self, generation: u64, principal: &str, nonce: Option<&str>) -> Result<String> {
        if !self.apply_if_current(generation, |s| s.set_connecting(true)) {
            return Err(disconnected_during("login"));
        }

        let outcome = self.exchange(principal, nonce).await;

        match outcome {
            Ok(token) => {
                if !self.apply_if_current(generation, |s| s.authenticate(principal, token.clone())) {
                    warn!(chain = %self.chain(), principal, "session disconnected during login, token dropped");
                    return Err(disconnected_during("login"));
                }
                self.persist().await;
                Ok(token)
            }
            Err(err) => {
                self.inner.state.send_modify(|s| s.set_connecting(false));
                warn!(chain = %self.chain(), principal, error = %err, "login failed");
                Err(err)
            }
        }
    }

    async fn exchange(&self, principal: &str, nonce: Option<&str>) -> Result<String> {
        let nonce = match nonce.map(str::trim).filter(|n| !n.is_empty()) {
            Some(nonce) => nonce.to_string(),
            None => self.fetch_nonce(principal).await?,
        };
        self.inner.client.login(principal, &nonce).await
    }

    async fn fetch_nonce(&self, principal: &str) -> Result<String> {
        let nonce = match self.inner.nonce_source.fetch_nonce(principal).await {
            Ok(nonce) => nonce,
            Err(SessionError::Nonce(message)) => return Err(SessionError::Nonce(message)),
            Err(err) => return Err(SessionError::Nonce(err.to_string())),
        };
        if nonce.trim().is_empty() {
            return Err(SessionError::Nonce("nonce source returned an empty nonce".to_string()));
        }
        Ok(nonce)
    }

    /// Whether the service still accepts `token`. Transport errors count as `false`.
    pub async fn check_login(&self, token: &str) -> bool {
        if token.is_empty() {
            return false;
        }
        match self.inner.client.verify_token(token).await {
            Ok(check) => check.is_valid(),
            Err(err) => {
                warn!(chain = %self.chain(), error = %err, "token verification failed");
                false
            }
        }
    }

    /// Trade `token` for a new one and store it.
    ///
    /// On failure the stored token is cleared so the next connect logs in.
    pub async fn refresh_token(&self, token: &str) -> Result<String> {
        self.refresh_in(self.generation(), token).await
    }

    async fn refresh_in(&self, generation: u64, token: &str) -> Result<String> {
        let result = if token.is_empty() {
            Err(SessionError::Authentication {
                message: "no token to refresh".to_string(),
            })
        } else {
            self.inner.client.refresh(token).await
        };

        match result {
            Ok(new_token) => {
                if !self.apply_if_current(generation, |s| s.replace_token(new_token.clone())) {
                    warn!(chain = %self.chain(), "session disconnected during refresh, token dropped");
                    return Err(disconnected_during("refresh"));
                }
                self.persist().await;
                debug!(chain = %self.chain(), "token refreshed");
                Ok(new_token)
            }
            Err(err) => {
                self.inner.state.send_modify(Session::clear_auth);
                self.persist().await;
                warn!(chain = %self.chain(), error = %err, "token refresh failed, session cleared");
                Err(err)
            }
        }
    }

    /// Refetch the profile for the current token.
    ///
    /// Errors are logged and the previous profile kept. A response that
    /// arrives after the token changed is dropped.
    pub async fn reload_profile(&self) {
        let token = self.inner.state.borrow().token.clone();
        if token.is_empty() {
            self.inner.state.send_if_modified(|s| {
                let had_profile = s.profile.is_some();
                if had_profile {
                    s.set_profile(None);
                }
                had_profile
            });
            return;
        }

        let profile = match self.inner.client.reward_stats(&token).await {
            Ok(profile) => profile,
            Err(err) => {
                warn!(chain = %self.chain(), error = %err, "profile reload failed");
                return;
            }
        };

        let applied = self.inner.state.send_if_modified(|s| {
            if s.token != token {
                return false;
            }
            s.set_profile(profile.clone())
        });

        if applied {
            debug!(chain = %self.chain(), has_profile = profile.is_some(), "profile reloaded");
            self.persist().await;
        } else {
            debug!(chain = %self.chain(), "discarded profile for superseded token");
        }
    }

    /// Drop token, profile and connected flag. No network call.
    ///
    /// A login or refresh still in flight will not bring the token back.
    pub async fn disconnect(&self) {
        self.inner.generation.fetch_add(1, Ordering::AcqRel);
        self.inner.state.send_modify(Session::clear_auth);
        self.persist().await;
        info!(chain = %self.chain(), "session disconnected");
    }

    /// Disconnect and also forget the principal, deleting the stored record.
    pub async fn forget(&self) {
        self.inner.generation.fetch_add(1, Ordering::AcqRel);
        self.inner.state.send_replace(Session::default());
        if let Err(err) = self.inner.store.clear(self.chain()).await {
            warn!(chain = %self.chain(), error = %err, "failed to delete stored session");
        }
        info!(chain = %self.chain(), "session forgotten");
    }

    fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::Acquire)
    }

    fn ensure_generation(&self, generation: u64) -> Result<()> {
        if self.generation() == generation {
            Ok(())
        } else {
            Err(disconnected_during("connect"))
        }
    }

    /// Mutate the session only if no disconnect happened since `generation`.
    ///
    /// The check runs under the watch write lock, and disconnect bumps the
    /// generation before taking it.
    fn apply_if_current(&self, generation: u64, apply: impl FnOnce(&mut Session)) -> bool {
        self.inner.state.send_if_modified(|s| {
            if self.inner.generation.load(Ordering::Acquire) != generation {
                return false;
            }
            apply(s);
            true
        })
    }

    async fn persist(&self) {
        let snapshot = self.snapshot();
        if let Err(err) = self.inner.store.save(self.chain(), &snapshot).await {
            warn!(chain = %self.chain(), error = %err, "failed to persist session");
        }
    }
}

fn disconnected_during(operation: &str) -> SessionError {
    SessionError::Authentication {
        message: format!("session was disconnected during {operation}"),
    }
}
