/*
[INPUT]:  Session configuration, nonce source and session store
[OUTPUT]: One session manager per configured chain identity
[POS]:    Application root - owns every chain's session
[UPDATE]: When chains are added or startup/teardown steps change
*/

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::warn;

use crate::auth::{NonceSource, SessionManager};
use crate::config::SessionConfig;
use crate::http::{LaunchpadClient, Result, SessionError};
use crate::store::{FileSessionStore, SessionStore};
use crate::types::{Chain, Session, SessionStatus};

/// Explicit owner of the per-chain sessions.
///
/// Build one at startup and hand references down; all mutation goes through
/// the managers it holds.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    managers: BTreeMap<Chain, SessionManager>,
}

impl SessionContext {
    /// Build managers for every configured chain, persisting to `config.store_dir`
    pub fn from_config(config: &SessionConfig, nonce_source: Arc<dyn NonceSource>) -> Result<Self> {
        let store: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new(config.store_dir()));
        Self::with_store(config, nonce_source, store)
    }

    /// Build managers for every configured chain over an explicit store
    pub fn with_store(
        config: &SessionConfig,
        nonce_source: Arc<dyn NonceSource>,
        store: Arc<dyn SessionStore>,
    ) -> Result<Self> {
        config.validate()?;
        let client_config = config.client_config();

        let mut context = Self::default();
        for (chain, chain_config) in &config.chains {
            let client = LaunchpadClient::with_config(client_config.clone(), &chain_config.base_url)?;
            context.insert(SessionManager::new(
                *chain,
                client,
                nonce_source.clone(),
                store.clone(),
            ));
        }
        Ok(context)
    }

    /// Add or replace the manager for its chain
    pub fn insert(&mut self, manager: SessionManager) {
        self.managers.insert(manager.chain(), manager);
    }

    pub fn manager(&self, chain: Chain) -> Result<&SessionManager> {
        self.managers
            .get(&chain)
            .ok_or_else(|| SessionError::Config(format!("chain {chain} is not configured")))
    }

    pub fn chains(&self) -> impl Iterator<Item = Chain> + '_ {
        self.managers.keys().copied()
    }

    /// Restore every chain from storage. A chain whose record cannot be read
    /// starts anonymous.
    pub async fn restore_all(&self) -> BTreeMap<Chain, SessionStatus> {
        let mut statuses = BTreeMap::new();
        for (chain, manager) in &self.managers {
            let status = match manager.restore().await {
                Ok(status) => status,
                Err(err) => {
                    warn!(chain = %chain, error = %err, "could not restore session");
                    SessionStatus::Anonymous
                }
            };
            statuses.insert(*chain, status);
        }
        statuses
    }

    pub async fn disconnect_all(&self) {
        for manager in self.managers.values() {
            manager.disconnect().await;
        }
    }

    pub fn snapshot(&self) -> BTreeMap<Chain, Session> {
        self.managers
            .iter()
            .map(|(chain, manager)| (*chain, manager.snapshot()))
            .collect()
    }
}
