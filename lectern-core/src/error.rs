use thiserror::Error;

/// Error taxonomy shared by every core operation.
///
/// Route boundaries translate these to HTTP status codes; core code never
/// surfaces raw storage errors.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Stable machine-readable code used in API error envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::Validation(_) => "validation_error",
            CoreError::NotFound(_) => "not_found",
            CoreError::Forbidden(_) => "forbidden",
            CoreError::Conflict(_) => "conflict",
            CoreError::Internal(_) => "internal_error",
        }
    }

    /// Whether a retry of the same operation may succeed.
    ///
    /// Only storage-level failures qualify; the rollup services use this to
    /// retry transient errors once before surfacing.
    pub fn is_transient(&self) -> bool {
        matches!(self, CoreError::Internal(_))
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
