//! Error types for the dialog controller.

use thiserror::Error;

/// Failures while talking to the host process.
///
/// Reports are best-effort, so these are logged by the controller and never
/// surfaced to the user.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("host write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("report serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("host channel closed")]
    Closed,
}

/// Invalid command-line or environment configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing value for {flag}")]
    MissingValue { flag: &'static str },

    #[error("invalid endpoint {value:?}: expected an http:// or https:// url")]
    InvalidEndpoint { value: String },

    #[error("resource name must not be empty")]
    EmptyResource,

    #[error("host command must not be empty")]
    EmptyHostCommand,
}
