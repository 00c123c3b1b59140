/*
[INPUT]:  Deserialized configuration (YAML in the CLI, any serde format elsewhere)
[OUTPUT]: Per-chain service endpoints, timeouts and storage location
[POS]:    Configuration layer - session context setup
[UPDATE]: When adding configuration options
*/

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::http::{ClientConfig, Result, SessionError};
use crate::store::FileSessionStore;
use crate::types::Chain;

/// Top-level session configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Auth service endpoint per chain identity
    pub chains: BTreeMap<Chain, ChainConfig>,
    /// Directory for persisted sessions
    #[serde(default)]
    pub store_dir: Option<PathBuf>,
    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// TCP connect timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

/// Per-chain service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChainConfig {
    /// Base URL of the auth/indexer service, e.g. `https://api.example.com/v1`
    pub base_url: String,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl SessionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.chains.is_empty() {
            return Err(SessionError::Config(
                "at least one chain must be configured".to_string(),
            ));
        }
        for (chain, chain_config) in &self.chains {
            if chain_config.base_url.trim().is_empty() {
                return Err(SessionError::Config(format!(
                    "base_url for chain {chain} must not be empty"
                )));
            }
        }
        if self.timeout_secs == 0 || self.connect_timeout_secs == 0 {
            return Err(SessionError::Config(
                "timeouts must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
        }
    }

    pub fn store_dir(&self) -> PathBuf {
        self.store_dir
            .clone()
            .unwrap_or_else(FileSessionStore::default_dir)
    }
}
