use thiserror::Error;

/// Error type for token operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is expired")]
    Expired,

    /// Signature mismatch, malformed structure, wrong algorithm, missing claim
    /// or foreign issuer.
    #[error("Token is invalid: {0}")]
    Invalid(String),
}
