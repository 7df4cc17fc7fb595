//! Error types for the Adyen gateway

use thiserror::Error;

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Main error type for gateway operations.
///
/// Only caller-contract violations and local faults are reported through this
/// type. Anything the remote processor says, including declines and error
/// pages, becomes a [`crate::Response`] with `success == false`.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client error (connection refused, timeout, TLS, ...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote server answered with a non-success status
    #[error("Remote responded with status {status}")]
    ResponseError { status: u16, body: String },

    /// A required option was not supplied by the caller
    #[error("Missing required option: {field}")]
    MissingOption { field: &'static str },

    /// A required card field was blank
    #[error("Missing required card field: {field}")]
    MissingField { field: &'static str },

    /// The authorization token did not yield a reference for the action
    #[error("No reference available for {action}")]
    MissingReference { action: &'static str },

    /// Invalid amount
    #[error("Invalid amount: {message}")]
    InvalidAmount { message: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GatewayError {
    /// Create a missing option error
    pub fn missing_option(field: &'static str) -> Self {
        Self::MissingOption { field }
    }

    /// Create a missing card field error
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    /// Create a missing reference error
    pub fn missing_reference(action: &'static str) -> Self {
        Self::MissingReference { action }
    }

    /// Create an invalid amount error
    pub fn invalid_amount(message: impl Into<String>) -> Self {
        Self::InvalidAmount {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether this error was raised before any request left the process.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::MissingOption { .. }
                | Self::MissingField { .. }
                | Self::MissingReference { .. }
                | Self::InvalidAmount { .. }
        )
    }

    /// Response body attached to a transport fault, if the server sent one.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Self::ResponseError { body, .. } => Some(body),
            _ => None,
        }
    }
}
