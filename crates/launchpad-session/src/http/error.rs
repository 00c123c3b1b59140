/*
[INPUT]:  Error sources (HTTP, API status, nonce source, storage, serialization)
[OUTPUT]: Structured error types with retry and auth classification
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for session operations
#[derive(Error, Debug)]
pub enum SessionError {
    /// HTTP request failed before a response arrived
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Service answered with a non-success status
    #[error("API error (code {code}): {message}")]
    Api { code: u16, message: String },

    /// Service accepted the request but issued no credential
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// On-chain nonce could not be obtained
    #[error("Nonce unavailable: {0}")]
    Nonce(String),

    /// Persisted session could not be read or written
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Configuration or precondition error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse classification callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network or server-side trouble; the same request may succeed later
    Transport,
    /// The service refused the credential or request
    Rejected,
    /// No nonce could be produced for login
    Nonce,
    /// Local storage, encoding or configuration problem
    Local,
}

impl SessionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SessionError::Http(_) => ErrorKind::Transport,
            SessionError::Api { code, .. } if *code >= 500 || *code == 429 => ErrorKind::Transport,
            SessionError::Api { .. } | SessionError::Authentication { .. } => ErrorKind::Rejected,
            SessionError::Nonce(_) => ErrorKind::Nonce,
            SessionError::Storage(_)
            | SessionError::Serialization(_)
            | SessionError::UrlParse(_)
            | SessionError::Config(_) => ErrorKind::Local,
        }
    }

    /// Check if the error is retryable
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }

    /// Check if error indicates the credential was refused
    pub fn is_auth_error(&self) -> bool {
        match self {
            SessionError::Authentication { .. } => true,
            SessionError::Api { code, .. } => *code == 401 || *code == 403,
            _ => false,
        }
    }

    /// Create an API error from status code and message
    pub fn api_error(status: StatusCode, message: impl Into<String>) -> Self {
        SessionError::Api {
            code: status.as_u16(),
            message: message.into(),
        }
    }
}

/// Result type alias for session operations
pub type Result<T> = std::result::Result<T, SessionError>;
