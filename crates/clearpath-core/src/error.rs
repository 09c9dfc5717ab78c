//! Error taxonomy for ClearPath.

use thiserror::Error;

/// Errors produced by the recall lookup and risk classification pipeline.
#[derive(Error, Debug)]
pub enum ClearPathError {
    /// Registry transport failure, timeout, or non-2xx status
    #[error("recall registry unavailable: {0}")]
    RegistryUnavailable(String),

    /// Registry body was not JSON or had an unexpected shape
    #[error("recall registry returned a malformed response: {0}")]
    RegistryMalformedResponse(String),

    /// Text-generation transport, auth, or status failure
    #[error("text generation unavailable: {0}")]
    GenerationUnavailable(String),

    /// Text-generation reply was empty or all whitespace
    #[error("text generation returned an empty reply")]
    EmptyReply,

    /// Vehicle identifier field was blank
    #[error("invalid vehicle identifier: {field} must not be empty")]
    InvalidIdentifier { field: &'static str },

    /// Missing or unparseable configuration value
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error (table export)
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClearPathError {
    /// Map a registry-side transport error, keeping timeouts distinguishable in the message.
    pub(crate) fn registry_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClearPathError::RegistryUnavailable(format!("request timed out: {err}"))
        } else {
            ClearPathError::RegistryUnavailable(err.to_string())
        }
    }

    /// Map a generation-side transport error.
    pub(crate) fn generation_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClearPathError::GenerationUnavailable(format!("request timed out: {err}"))
        } else {
            ClearPathError::GenerationUnavailable(err.to_string())
        }
    }
}

/// Result type for ClearPath operations.
pub type Result<T> = std::result::Result<T, ClearPathError>;
