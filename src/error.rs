//! Error types for the helpdesk call client
//!
//! Every failure on the call path converges back to the idle state, so these
//! errors are logged and reported, never fatal.

use thiserror::Error;

/// Failures while obtaining an access token from the backend
#[derive(Error, Debug, Clone)]
pub enum TokenError {
    /// The request could not be sent or the connection failed
    #[error("token request failed: {0}")]
    Request(String),

    /// The backend answered with a non-success status
    #[error("token endpoint returned HTTP {status}")]
    Status { status: u16 },

    /// The response body was not the expected JSON object
    #[error("token response could not be decoded: {0}")]
    Decode(String),

    /// The JSON object did not carry a usable access token
    #[error("token response did not contain an access token")]
    MissingToken,
}

/// Failures reported by the call session collaborator
#[derive(Error, Debug, Clone)]
pub enum SessionError {
    /// `start_call` was rejected
    #[error("call session rejected start: {0}")]
    StartRejected(String),

    /// The remote side reported an error on an open session
    #[error("call session error: {0}")]
    Remote(String),
}

/// Top-level error for the call toggle
#[derive(Error, Debug, Clone)]
pub enum CallError {
    /// Fetching the access token failed
    #[error("failed to fetch access token: {0}")]
    TokenFetch(#[from] TokenError),

    /// The call session failed to start or errored while open
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Errors that can occur when loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// The token endpoint base URL is not a valid absolute URL
    #[error("invalid api base url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Result type alias for call operations
pub type Result<T> = std::result::Result<T, CallError>;
