//! Service-level error type returned across the provider boundary.

use thiserror::Error;

/// Top-level provider error type.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::BadRequest`] → 400
/// - [`ServiceError::DecryptionFailed`] → 422
/// - [`ServiceError::Unavailable`] → 503
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request was malformed: invalid JSON, a bad master key, or an
    /// artifact that is not `<ciphertext>--<nonce>--<tag>`.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The artifact did not authenticate under the supplied master key.
    #[error("decryption failed: {0}")]
    DecryptionFailed(String),

    /// A required resource (the secure random source) is unavailable.
    #[error("service unavailable: {0}")]
    Unavailable(String),
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 400,
            ServiceError::DecryptionFailed(_) => 422,
            ServiceError::Unavailable(_) => 503,
        }
    }

    /// Short machine-readable code for [`crate::protocol::ErrorResponse`].
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::BadRequest(_) => "bad_request",
            ServiceError::DecryptionFailed(_) => "decryption_failed",
            ServiceError::Unavailable(_) => "service_unavailable",
        }
    }
}
