//! Velvica API client error types.
//!
//! The validation and "not allowed" message strings are a wire-visible
//! contract shared with the embedding applications — do not reword them.

use crate::config::ConfigError;

/// Errors from Velvica API calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    /// A required option was absent from the options bag.
    #[error("Failed to validate: {0} is required.")]
    MissingOption(String),

    /// An option was present but rejected by its schema.
    #[error("Failed to validate: {0} is invalid.")]
    InvalidOption(String),

    /// An unrecognized VPS state-change literal.
    #[error("Action change {0} is not allowed!")]
    UnknownStateChange(String),

    /// An unrecognized console-log filter literal.
    #[error("Log count {0} is not allowed!")]
    UnknownLogFilter(String),

    /// `rebuild` was called without the mandatory image identifier.
    #[error("Cannot rebuild without imageUUID specified.")]
    MissingImageUuid,

    /// The HTTP call itself failed (DNS, connection, body read).
    #[error("HTTP transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// Produced by a registered connection-failure handler.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The backend reported a non-success status. Typically produced by a
    /// registered error handler from the `error`/`detail` fields of the body.
    #[error("{status}: {code}")]
    Api {
        status: u16,
        code: String,
        detail: Option<String>,
    },

    /// The response body (or OAuth token response) was not usable JSON.
    #[error("malformed response body: {0}")]
    MalformedResponse(String),

    /// Illegal facade configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The cancellation handle fired before the request completed.
    #[error("request cancelled")]
    Cancelled,
}
