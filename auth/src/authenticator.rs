use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;

use crate::jwt::Assertion;
use crate::jwt::Claims;
use crate::jwt::TokenError;
use crate::jwt::TokenIssuer;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and token issuance.
///
/// Holds a dummy hash computed at construction with the hasher's cost. Lookups
/// that find no stored hash are verified against it, so an unknown identifier
/// costs the same work as a wrong password.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_issuer: TokenIssuer,
    dummy_hash: String,
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Errors
    /// * `PasswordError` - Computing the dummy hash failed
    pub fn new(
        password_hasher: PasswordHasher,
        token_issuer: TokenIssuer,
    ) -> Result<Self, PasswordError> {
        let dummy_password = SaltString::generate(&mut OsRng);
        let dummy_hash = password_hasher.hash(dummy_password.as_str())?;

        Ok(Self {
            password_hasher,
            token_issuer,
            dummy_hash,
        })
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Input rejected or hashing failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify a password against a stored hash, or against the dummy hash when
    /// there is none.
    ///
    /// # Returns
    /// True only if `stored_hash` is present and matches
    ///
    /// # Errors
    /// * `MalformedHash` - Stored hash is corrupted
    /// * `PasswordTooLong` - Password exceeds the configured maximum
    pub fn verify_password(
        &self,
        password: &str,
        stored_hash: Option<&str>,
    ) -> Result<bool, PasswordError> {
        match stored_hash {
            Some(hash) => self.password_hasher.verify(password, hash),
            None => {
                // Same work as a real verification; the result is discarded.
                let _ = self.password_hasher.verify(password, &self.dummy_hash)?;
                Ok(false)
            }
        }
    }

    /// Mint an assertion for an authenticated subject.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token generation failed
    pub fn issue_token(&self, subject: &str) -> Result<Assertion, TokenError> {
        self.token_issuer.issue(subject)
    }

    /// Validate an assertion and return its claims.
    ///
    /// # Errors
    /// * `Invalid` - Tag mismatch or malformed token
    /// * `Expired` - Token is past its expiry
    pub fn validate_token(&self, token: &str) -> Result<Claims, TokenError> {
        let claims = self.token_issuer.validate(token);
        if let Err(e) = &claims {
            tracing::debug!(error = %e, "Assertion rejected");
        }
        claims
    }
}
