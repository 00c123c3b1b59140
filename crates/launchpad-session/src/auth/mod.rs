/*
[INPUT]:  Principal, optional nonce, HTTP client and session store
[OUTPUT]: Bearer tokens and the per-chain session lifecycle
[POS]:    Auth layer - session token management
[UPDATE]: When the connect flow or nonce providers change
*/

pub mod manager;
pub mod nonce;

pub use manager::{ConnectPath, Connected, SessionManager};
pub use nonce::{MockNonceSource, NonceSource, UnavailableNonceSource};
