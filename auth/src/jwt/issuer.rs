use chrono::DateTime;
use chrono::Duration;
use chrono::SubsecRound;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Assertion;
use super::claims::Claims;
use super::errors::TokenError;

/// Issues and validates identity assertions.
///
/// Assertions are HS256 JWTs signed with a server-held key. Expiry is checked
/// against a caller-supplied instant after the signature, so a token with a
/// bad tag is `Invalid` whatever its `exp` says.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    validation: Validation,
    issuer: String,
    ttl: Duration,
}

impl TokenIssuer {
    /// Create a new token issuer.
    ///
    /// # Arguments
    /// * `secret` - Signing key material (at least 32 bytes for HS256)
    /// * `issuer` - Value written to and required in the `iss` claim
    /// * `ttl` - Lifetime of issued assertions
    pub fn new(secret: &[u8], issuer: impl ToString, ttl: Duration) -> Self {
        let algorithm = Algorithm::HS256;
        let issuer = issuer.to_string();

        let mut validation = Validation::new(algorithm);
        // Expiry is evaluated in `validate_at` against an explicit clock.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "iat", "exp", "iss"]);
        validation.set_issuer(&[issuer.as_str()]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm,
            validation,
            issuer,
            ttl,
        }
    }

    /// Lifetime of issued assertions.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Mint an assertion for `subject`, valid from now for the configured ttl.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(&self, subject: &str) -> Result<Assertion, TokenError> {
        self.issue_at(subject, Utc::now())
    }

    /// Mint an assertion as if the current time were `now`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Expiry is not representable, or token encoding failed
    pub fn issue_at(&self, subject: &str, now: DateTime<Utc>) -> Result<Assertion, TokenError> {
        let issued_at = now.trunc_subsecs(0);
        let expires_at = issued_at.checked_add_signed(self.ttl).ok_or_else(|| {
            TokenError::EncodingFailed(format!("expiry overflows for ttl {}", self.ttl))
        })?;
        let claims = Claims::for_subject(subject, &self.issuer, issued_at, expires_at);

        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))?;

        Ok(Assertion {
            token,
            subject: claims.sub,
            issued_at,
            expires_at,
        })
    }

    /// Validate a token against the current time.
    ///
    /// # Returns
    /// Decoded claims
    ///
    /// # Errors
    /// * `Invalid` - Tag mismatch or malformed token
    /// * `Expired` - Token is authentic but past its `exp`
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        self.validate_at(token, Utc::now())
    }

    /// Validate a token as if the current time were `now`.
    ///
    /// # Errors
    /// * `Invalid` - Tag mismatch or malformed token
    /// * `Expired` - Token is authentic but `now` is past its `exp`
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| TokenError::Invalid(e.to_string()))?;

        if token_data.claims.is_expired(now.timestamp()) {
            return Err(TokenError::Expired);
        }

        Ok(token_data.claims)
    }
}
