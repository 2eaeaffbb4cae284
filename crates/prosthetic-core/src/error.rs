//! Error types for environment construction and interaction.

use thiserror::Error;

/// Result type for environment operations.
pub type Result<T> = std::result::Result<T, EnvError>;

/// Error types that can occur while building or driving an environment.
#[derive(Debug, Error)]
pub enum EnvError {
    /// Invalid configuration (negative weights, empty ranges, etc.)
    #[error("invalid configuration for '{param}': {message}")]
    InvalidConfig { param: String, message: String },

    /// The wrapped environment exposes an action space the caller cannot handle.
    #[error("unsupported action space: {0}")]
    UnsupportedActionSpace(String),

    /// Action length does not match the action space dimension.
    #[error("action dimension mismatch: expected {expected}, got {actual}")]
    ActionDimensionMismatch { expected: usize, actual: usize },

    /// `step` was called before the first `reset`.
    #[error("cannot call step() before reset()")]
    ResetNeeded,

    /// Underlying I/O failure (log files, traces).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl EnvError {
    /// Shorthand for [`EnvError::InvalidConfig`].
    pub fn invalid_config(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            param: param.into(),
            message: message.into(),
        }
    }
}
