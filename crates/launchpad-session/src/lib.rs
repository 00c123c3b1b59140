/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public launchpad session crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod auth;
pub mod config;
pub mod context;
pub mod http;
pub mod store;
pub mod types;

// Re-export commonly used types from auth
pub use auth::{
    ConnectPath,
    Connected,
    MockNonceSource,
    NonceSource,
    SessionManager,
    UnavailableNonceSource,
};

pub use config::{ChainConfig, SessionConfig};
pub use context::SessionContext;

// Re-export commonly used types from http
pub use http::{
    ClientConfig,
    ErrorKind,
    LaunchpadClient,
    Result,
    SessionError,
};

pub use store::{FileSessionStore, MemorySessionStore, SessionStore};

// Re-export all types
pub use types::*;
