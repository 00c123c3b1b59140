/*
[INPUT]:  Principal requesting a login
[OUTPUT]: Single-use random nonce for the login exchange
[POS]:    Auth layer - on-chain nonce collaborator abstraction
[UPDATE]: When adding nonce providers or changing nonce format
*/

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::http::{Result, SessionError};

/// Source of anti-replay nonces for login.
///
/// On the real platform this is a canister call made through the wallet, so
/// the trait is async and the core treats it as a black box.
#[async_trait]
pub trait NonceSource: Send + Sync {
    /// Return a fresh single-use nonce scoped to `principal`
    async fn fetch_nonce(&self, principal: &str) -> Result<String>;
}

/// Mock nonce source for testing
#[derive(Debug)]
pub struct MockNonceSource {
    nonce: Option<String>,
    calls: AtomicUsize,
}

impl MockNonceSource {
    /// Always hands out `nonce`
    pub fn new(nonce: &str) -> Self {
        Self {
            nonce: Some(nonce.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Always fails, as an unreachable canister would
    pub fn failing() -> Self {
        Self {
            nonce: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of nonces requested so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NonceSource for MockNonceSource {
    async fn fetch_nonce(&self, principal: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.nonce
            .clone()
            .ok_or_else(|| SessionError::Nonce(format!("no nonce available for {principal}")))
    }
}

/// Nonce source for hosts without on-chain access; callers must pass a nonce.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableNonceSource;

#[async_trait]
impl NonceSource for UnavailableNonceSource {
    async fn fetch_nonce(&self, _principal: &str) -> Result<String> {
        Err(SessionError::Nonce(
            "no on-chain nonce source configured; supply a nonce explicitly".to_string(),
        ))
    }
}
