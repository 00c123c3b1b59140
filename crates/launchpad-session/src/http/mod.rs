/*
[INPUT]:  HTTP client configuration and service endpoints
[OUTPUT]: HTTP responses and typed API results
[POS]:    HTTP layer - REST communication with the auth/profile service
[UPDATE]: When adding new endpoints or changing client behavior
*/

pub mod auth;
pub mod client;
pub mod error;
pub mod user;

pub use error::{ErrorKind, Result, SessionError};

pub use client::{ClientConfig, LaunchpadClient};
