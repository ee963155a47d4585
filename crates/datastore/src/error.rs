use thiserror::Error;

use orderapp_core::{ModelError, ModelId};

/// Data store operation error.
///
/// Every store operation completes with either a value or one of these; the
/// store never retries on the caller's behalf.
#[derive(Debug, Clone, Error)]
pub enum DataStoreError {
    /// No record with this id exists for the model.
    #[error("{model} '{id}' not found")]
    NotFound { model: &'static str, id: ModelId },

    /// The query references a field the model does not have, or a field of
    /// another model.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// A record could not be encoded or decoded.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Store internals failed (e.g. a poisoned lock).
    #[error("data store internal error: {0}")]
    Internal(String),
}

impl DataStoreError {
    pub fn invalid_query(msg: impl Into<String>) -> Self {
        Self::InvalidQuery(msg.into())
    }

    pub(crate) fn poisoned() -> Self {
        Self::Internal("lock poisoned".to_string())
    }
}
