use thiserror::Error;

/// Error type for password operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password must not be empty")]
    EmptyPassword,

    #[error("Password too long: maximum {max} characters, got {actual}")]
    PasswordTooLong { max: usize, actual: usize },

    #[error("Invalid hashing parameters: {0}")]
    InvalidParameters(String),

    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// The stored hash could not be parsed or uses an unsupported scheme.
    #[error("Stored password hash is malformed: {0}")]
    MalformedHash(String),
}
