use thiserror::Error;

/// Error taxonomy for the NOC core.
///
/// Validation, NotFound, Authorization and Conflict propagate to the caller
/// verbatim. External errors in the notification path are swallowed into
/// delivery state; in the probe path they become domain state. Internal
/// errors surface as generic failures and are written to the audit log.
#[derive(Error, Debug)]
pub enum NocError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("External error: {0}")]
    External(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type NocResult<T> = Result<T, NocError>;

impl NocError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// True for errors the caller can fix (4xx-class).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::NotFound(_) | Self::Authorization(_) | Self::Conflict(_)
        )
    }
}
