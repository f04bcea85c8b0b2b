use auth::PasswordError;
use auth::TokenError;
use thiserror::Error;

/// Error for Identifier validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("Identifier must not be empty")]
    Empty,

    #[error("Identifier is not a valid email address: {0}")]
    InvalidFormat(String),
}

/// Error for secret policy violations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SecretError {
    #[error("Secret must not be empty")]
    Empty,

    #[error("Secret too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Secret too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error reported by identity store adapters
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// A record with the same identifier already exists.
    #[error("Identifier already present")]
    Conflict,

    #[error("Identity store unavailable: {0}")]
    Unavailable(String),

    /// A stored row could not be decoded into an identity record.
    #[error("Stored identity record is corrupted: {0}")]
    Corrupted(String),
}

/// Top-level error for all identity operations
#[derive(Debug, Clone, Error)]
pub enum IdentityError {
    // Input errors, safe to report precisely
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(#[from] IdentifierError),

    #[error("Invalid secret: {0}")]
    InvalidSecret(#[from] SecretError),

    // Domain-level errors
    #[error("Identity already exists")]
    DuplicateIdentity,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token is expired")]
    TokenExpired,

    #[error("Token is invalid")]
    TokenInvalid,

    // Infrastructure errors
    #[error("Identity store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Integrity error: {0}")]
    Integrity(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token issuance failed: {0}")]
    TokenIssuance(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<StoreError> for IdentityError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict => IdentityError::DuplicateIdentity,
            StoreError::Unavailable(msg) => IdentityError::StoreUnavailable(msg),
            StoreError::Corrupted(msg) => IdentityError::Integrity(msg),
        }
    }
}

impl From<PasswordError> for IdentityError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::EmptyPassword => IdentityError::InvalidSecret(SecretError::Empty),
            PasswordError::PasswordTooLong { max, actual } => {
                IdentityError::InvalidSecret(SecretError::TooLong { max, actual })
            }
            PasswordError::MalformedHash(msg) => IdentityError::Integrity(msg),
            PasswordError::InvalidParameters(msg) | PasswordError::HashingFailed(msg) => {
                IdentityError::Hashing(msg)
            }
        }
    }
}

impl From<TokenError> for IdentityError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => IdentityError::TokenExpired,
            TokenError::Invalid(_) => IdentityError::TokenInvalid,
            TokenError::EncodingFailed(msg) => IdentityError::TokenIssuance(msg),
        }
    }
}
