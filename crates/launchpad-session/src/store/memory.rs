/*
[INPUT]:  Session snapshots keyed by chain
[OUTPUT]: In-process session records
[POS]:    Persistence layer - ephemeral backend for tests and one-shot use
[UPDATE]: When the store trait changes
*/

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::http::Result;
use crate::store::SessionStore;
use crate::types::{Chain, Session};

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    records: Mutex<HashMap<Chain, Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record, as if it had been persisted by an earlier run.
    pub async fn insert(&self, chain: Chain, session: Session) {
        self.records.lock().await.insert(chain, session);
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, chain: Chain) -> Result<Option<Session>> {
        Ok(self.records.lock().await.get(&chain).cloned())
    }

    async fn save(&self, chain: Chain, session: &Session) -> Result<()> {
        self.records.lock().await.insert(chain, session.clone());
        Ok(())
    }

    async fn clear(&self, chain: Chain) -> Result<()> {
        self.records.lock().await.remove(&chain);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_isolates_chains() {
        let store = MemorySessionStore::new();
        let mut session = Session::default();
        session.token = "tok-ic".to_string();

        store.save(Chain::Ic, &session).await.unwrap();
        assert_eq!(store.load(Chain::Ic).await.unwrap().unwrap().token, "tok-ic");
        assert!(store.load(Chain::Btc).await.unwrap().is_none());

        store.clear(Chain::Ic).await.unwrap();
        assert!(store.load(Chain::Ic).await.unwrap().is_none());
    }
}
