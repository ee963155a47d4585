//! Model-level error model.

use thiserror::Error;

/// Result type used across the model layer.
pub type ModelResult<T> = Result<T, ModelError>;

/// Model-level error.
///
/// Raised when data coming from outside the builder API (strings, JSON)
/// cannot be turned into a well-formed value. The staged builders themselves
/// cannot fail.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// An identifier was invalid (e.g. empty).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A temporal scalar failed to parse.
    #[error("invalid temporal value: {0}")]
    InvalidTemporal(String),

    /// A serialized record could not be decoded into its model type
    /// (missing required field, wrong type, ...).
    #[error("malformed {model} record: {reason}")]
    Malformed { model: &'static str, reason: String },
}

impl ModelError {
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn invalid_temporal(msg: impl Into<String>) -> Self {
        Self::InvalidTemporal(msg.into())
    }

    pub fn malformed(model: &'static str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            model,
            reason: reason.into(),
        }
    }
}
