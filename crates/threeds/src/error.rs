use thiserror::Error;

/// Errors returned by the 3DS flow steps and the remote service client.
#[derive(Debug, Error)]
pub enum ThreeDsError {
    /// Malformed or missing caller input. Never retried.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid color depth: {0}")]
    InvalidColorDepth(i32),

    /// The referenced transaction is unknown to the store.
    #[error("transaction not found: {0}")]
    NotFound(String),

    /// The remote 3DS server rejected our API credentials.
    #[error("authorization token not valid")]
    Unauthorized,

    /// The card is not enrolled in any 3DS card range.
    #[error("card range not found")]
    CardRangeNotFound,

    /// Remote service unreachable, non-success status or undecodable body.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// The remote service returned a version/status pair outside the protocol table.
    #[error("unrecognized authentication outcome (messageVersion={version:?}, transStatus={status:?})")]
    UnrecognizedOutcome { version: String, status: String },
}

impl ThreeDsError {
    /// Whether a caller may reasonably retry the operation with backoff.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ThreeDsError::Upstream(_))
    }
}
