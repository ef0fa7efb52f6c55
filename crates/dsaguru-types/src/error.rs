use thiserror::Error;

/// Errors from quota store operations (used by trait definitions in dsaguru-core).
#[derive(Debug, Error)]
pub enum QuotaError {
    /// The backing store could not be reached or rejected the operation.
    #[error("quota store unavailable: {0}")]
    StoreUnavailable(String),

    /// A stored record exists but its fields cannot be interpreted.
    #[error("corrupt quota record for user '{user_id}': {reason}")]
    CorruptRecord { user_id: String, reason: String },
}

impl QuotaError {
    /// Whether this error means the store itself is unreachable, as opposed
    /// to a readable store holding a bad row.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, QuotaError::StoreUnavailable(_))
    }
}
