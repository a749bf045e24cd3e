//! OpenNMS client errors

use thiserror::Error;

/// Errors that can occur when interacting with the OpenNMS REST API
#[derive(Debug, Error)]
pub enum OnmsError {
    /// Connection failure, timeout, or body read error from the HTTP layer
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-2xx status
    #[error("{method} {path} failed: {status} - {body}")]
    Status {
        method: &'static str,
        path: String,
        status: u16,
        body: String,
    },

    /// Requested accept type is not one of JSON, plain text, or XML
    #[error("Unsupported accept type: {0}")]
    UnsupportedAcceptType(String),

    /// The server returned a shape the client cannot interpret
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// A coded enumeration value is missing from its lookup table
    #[error("Unknown {kind} code: {code:?}")]
    UnknownEnumerationCode { kind: &'static str, code: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Server or auth configuration is unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl OnmsError {
    /// True for failures of the network call itself (connection, timeout, non-2xx).
    pub fn is_transport(&self) -> bool {
        matches!(self, OnmsError::Transport(_) | OnmsError::Status { .. })
    }

    /// HTTP status code, when the server answered with one.
    pub fn status(&self) -> Option<u16> {
        match self {
            OnmsError::Status { status, .. } => Some(*status),
            OnmsError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
