/*
[INPUT]:  Session snapshots keyed by chain
[OUTPUT]: Durable or in-memory session records
[POS]:    Persistence layer - restores sessions at startup
[UPDATE]: When adding storage backends or changing the record format
*/

pub mod file;
pub mod memory;

use async_trait::async_trait;

use crate::http::Result;
use crate::types::{Chain, Session};

pub use file::FileSessionStore;
pub use memory::MemorySessionStore;

/// Key-value persistence for one session record per chain.
///
/// Every mutation overwrites the whole record.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, chain: Chain) -> Result<Option<Session>>;

    async fn save(&self, chain: Chain, session: &Session) -> Result<()>;

    async fn clear(&self, chain: Chain) -> Result<()>;
}
