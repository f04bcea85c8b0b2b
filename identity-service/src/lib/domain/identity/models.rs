use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use email_address::EmailAddress;
use email_address::Options;

use crate::identity::errors::IdentifierError;
use crate::identity::errors::SecretError;

/// Durable identity record.
///
/// One record exists per normalized identifier.
#[derive(Debug, Clone)]
pub struct IdentityRecord {
    pub identifier: Identifier,
    pub credential_hash: CredentialHash,
    pub created_at: DateTime<Utc>,
}

/// Normalized identifier type
///
/// Trimmed, lower-cased email address. The natural key of an identity record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
    /// Normalize and validate a raw identifier.
    ///
    /// # Arguments
    /// * `raw` - Identifier as supplied by the caller
    ///
    /// Only a bare `local@domain` is accepted; the stored key is its addr-spec.
    ///
    /// # Returns
    /// Identifier holding the trimmed, lower-cased address
    ///
    /// # Errors
    /// * `Empty` - Nothing left after trimming
    /// * `InvalidFormat` - Not a bare email address (local part, `@`, domain)
    pub fn parse(raw: &str) -> Result<Self, IdentifierError> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(IdentifierError::Empty);
        }

        let options = Options::default()
            .without_display_text()
            .without_domain_literal();
        let address = EmailAddress::parse_with_options(&normalized, options)
            .map_err(|e| IdentifierError::InvalidFormat(e.to_string()))?;

        if address.local_part().starts_with('"') {
            return Err(IdentifierError::InvalidFormat(
                "Quoted local part is not accepted".to_string(),
            ));
        }

        let canonical = address.email();
        if canonical != normalized {
            return Err(IdentifierError::InvalidFormat(
                "Not a bare email address".to_string(),
            ));
        }

        Ok(Identifier(canonical))
    }

    /// Get identifier as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Stored credential hash (PHC string).
///
/// Opaque outside the verification path: `Debug` is redacted and there is no
/// equality, so the hash cannot end up in logs or be compared directly.
#[derive(Clone)]
pub struct CredentialHash(String);

impl CredentialHash {
    pub fn new(hash: String) -> Self {
        Self(hash)
    }

    /// Raw PHC string, for the verifier and the store adapter only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CredentialHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CredentialHash(<redacted>)")
    }
}

/// Length policy applied to secrets before hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecretPolicy {
    pub min_length: usize,
    pub max_length: usize,
}

impl SecretPolicy {
    pub const DEFAULT_MIN_LENGTH: usize = 8;
    pub const DEFAULT_MAX_LENGTH: usize = 128;

    pub fn new(min_length: usize, max_length: usize) -> Self {
        Self {
            min_length,
            max_length,
        }
    }

    /// Check a secret against the full policy (registration).
    ///
    /// # Errors
    /// * `Empty` - Secret is empty
    /// * `TooShort` - Fewer than `min_length` characters
    /// * `TooLong` - More than `max_length` characters
    pub fn check(&self, secret: &str) -> Result<(), SecretError> {
        if secret.is_empty() {
            return Err(SecretError::Empty);
        }
        self.check_upper_bound(secret)?;

        let length = secret.chars().count();
        if length < self.min_length {
            return Err(SecretError::TooShort {
                min: self.min_length,
                actual: length,
            });
        }
        Ok(())
    }

    /// Check only the maximum length (login), which bounds hashing work.
    pub fn check_upper_bound(&self, secret: &str) -> Result<(), SecretError> {
        let length = secret.chars().count();
        if length > self.max_length {
            Err(SecretError::TooLong {
                max: self.max_length,
                actual: length,
            })
        } else {
            Ok(())
        }
    }
}

impl Default for SecretPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MIN_LENGTH, Self::DEFAULT_MAX_LENGTH)
    }
}

/// Command to register a new identity
pub struct RegisterCommand {
    pub identifier: String,
    pub secret: String,
}

impl RegisterCommand {
    /// Construct a new register command.
    ///
    /// # Arguments
    /// * `identifier` - Raw identifier (normalized by the workflow)
    /// * `secret` - Plain text secret (will be hashed by service)
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for RegisterCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterCommand")
            .field("identifier", &self.identifier)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Command to authenticate an identity
pub struct LoginCommand {
    pub identifier: String,
    pub secret: String,
}

impl LoginCommand {
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for LoginCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCommand")
            .field("identifier", &self.identifier)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Why an authentication attempt was rejected.
///
/// Deliberately a single reason: unknown identifier and wrong secret are
/// indistinguishable to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    InvalidCredentials,
}

/// Result of verifying a credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthenticationOutcome {
    Authenticated { identifier: Identifier },
    Rejected(RejectionReason),
}

/// Issued on successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub identifier: Identifier,
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_is_normalized() {
        let identifier = Identifier::parse("  Alice@Example.COM \n").unwrap();
        assert_eq!(identifier.as_str(), "alice@example.com");
    }

    #[test]
    fn test_identifier_normalization_is_idempotent() {
        let once = Identifier::parse("A@X.com").unwrap();
        let twice = Identifier::parse(once.as_str()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_identifier_empty() {
        assert_eq!(Identifier::parse("   "), Err(IdentifierError::Empty));
    }

    #[test]
    fn test_identifier_invalid_format() {
        for raw in ["not-an-email", "@x.com", "a@", "a b@x.com"] {
            assert!(
                matches!(
                    Identifier::parse(raw),
                    Err(IdentifierError::InvalidFormat(_))
                ),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn test_identifier_rejects_alternate_mailbox_spellings() {
        for raw in [
            "A <a@x.com>",
            "b <a@x.com>",
            "<a@x.com>",
            "\"a\"@x.com",
            "a@[127.0.0.1]",
        ] {
            assert!(
                matches!(
                    Identifier::parse(raw),
                    Err(IdentifierError::InvalidFormat(_))
                ),
                "{raw} should be rejected"
            );
        }
        assert_eq!(Identifier::parse("a@x.com").unwrap().as_str(), "a@x.com");
    }

    #[test]
    fn test_credential_hash_debug_is_redacted() {
        let hash = CredentialHash::new("$argon2id$v=19$secret".to_string());
        assert_eq!(format!("{:?}", hash), "CredentialHash(<redacted>)");
    }

    #[test]
    fn test_commands_debug_redact_secret() {
        let command = RegisterCommand::new("a@x.com", "correcthorse1");
        let rendered = format!("{:?}", command);
        assert!(rendered.contains("a@x.com"));
        assert!(!rendered.contains("correcthorse1"));

        let command = LoginCommand::new("a@x.com", "correcthorse1");
        assert!(!format!("{:?}", command).contains("correcthorse1"));
    }

    #[test]
    fn test_secret_policy() {
        let policy = SecretPolicy::new(8, 16);

        assert_eq!(policy.check(""), Err(SecretError::Empty));
        assert_eq!(
            policy.check("short"),
            Err(SecretError::TooShort { min: 8, actual: 5 })
        );
        assert_eq!(
            policy.check(&"a".repeat(17)),
            Err(SecretError::TooLong {
                max: 16,
                actual: 17
            })
        );
        assert!(policy.check("correcthorse1").is_ok());
    }

    #[test]
    fn test_secret_policy_counts_characters() {
        let policy = SecretPolicy::new(8, 8);
        // 8 characters, 16 bytes
        assert!(policy.check("éééééééé").is_ok());
    }
}
