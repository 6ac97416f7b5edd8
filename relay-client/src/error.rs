//! Error types for the Relay client

use relay_core::token::Token;
use std::time::Duration;
use thiserror::Error;

use crate::transport::TransportError;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to the build server
#[derive(Debug, Error)]
pub enum ClientError {
    /// Request never got a response
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    /// The caller's deadline expired before the server answered
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The server answered with a status this operation does not accept
    #[error("unexpected response (status {status}): {message}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Response body, if any
        message: String,
    },

    /// Trigger accepted without a Location header
    #[error("trigger accepted but no location header was returned")]
    MissingLocation,

    /// Response body did not match the expected JSON shape
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// History does not list the build yet
    #[error("did not find build {token}")]
    BuildNotFound { token: Token },

    /// Several history records carry the same token
    #[error("token {token} matched {matches} builds")]
    AmbiguousBuild { token: Token, matches: usize },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ClientError {
    pub fn unexpected_status(status: u16, message: impl Into<String>) -> Self {
        Self::UnexpectedStatus {
            status,
            message: message.into(),
        }
    }

    /// Worth polling again: connection trouble or a build that is not listed yet
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(err) => err.is_transient(),
            Self::Timeout(_) | Self::BuildNotFound { .. } => true,
            _ => false,
        }
    }

    /// The build is not (yet) in the job's history
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::BuildNotFound { .. })
    }
}
