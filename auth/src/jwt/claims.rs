use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// Claims carried by an identity assertion.
///
/// Every field is required: a token missing any of them is rejected as invalid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (normalized identifier)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// JWT ID (unique per assertion)
    pub jti: String,
}

impl Claims {
    /// Create claims for a subject valid from `issued_at` through `expires_at`.
    ///
    /// # Arguments
    /// * `subject` - Normalized identifier the assertion speaks for
    /// * `issuer` - Name of the issuing service
    /// * `issued_at` - Issuance instant
    /// * `expires_at` - Last instant the assertion is accepted
    pub fn for_subject(
        subject: impl ToString,
        issuer: impl ToString,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            iss: issuer.to_string(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Check if the assertion is expired at `current_timestamp`.
    ///
    /// Valid up to and including the `exp` second.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp > self.exp
    }
}

/// Signed, time-bounded proof of an authenticated identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assertion {
    /// Encoded JWT (header, claims, HMAC tag)
    pub token: String,
    pub subject: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
