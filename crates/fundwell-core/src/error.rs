use thiserror::Error;

pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Failure of a workflow operation. The message is meant for the end user,
/// except for `Persistence`.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Missing or wrong role for the operation.
    #[error("{0}")]
    Unauthorized(String),

    /// Missing or malformed input. Nothing was written.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// A row exists but something it references does not.
    #[error("{0}")]
    IntegrityGap(String),

    #[error("{0}")]
    Conflict(String),

    /// A stored value is outside the set the schema allows.
    #[error("{0}")]
    CorruptState(String),

    #[error(transparent)]
    Persistence(#[from] anyhow::Error),
}

impl WorkflowError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }
}
