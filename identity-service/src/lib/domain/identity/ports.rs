use async_trait::async_trait;

use crate::domain::identity::models::AuthenticationOutcome;
use crate::domain::identity::models::Identifier;
use crate::domain::identity::models::IdentityRecord;
use crate::domain::identity::models::LoginCommand;
use crate::domain::identity::models::RegisterCommand;
use crate::domain::identity::models::Session;
use crate::identity::errors::IdentityError;
use crate::identity::errors::StoreError;

/// Credential lifecycle operations exposed to inbound adapters.
#[async_trait]
pub trait IdentityServicePort: Send + Sync + 'static {
    /// Register a new identity.
    ///
    /// # Arguments
    /// * `command` - Raw identifier and plaintext secret
    ///
    /// # Returns
    /// Normalized identifier of the created identity
    ///
    /// # Errors
    /// * `InvalidIdentifier` - Identifier is empty or not an email address
    /// * `InvalidSecret` - Secret violates the length policy
    /// * `DuplicateIdentity` - Identifier is already registered
    /// * `StoreUnavailable` - Identity store failed
    async fn register(&self, command: RegisterCommand) -> Result<Identifier, IdentityError>;

    /// Verify a credential without issuing an assertion.
    ///
    /// # Returns
    /// `Authenticated` or a uniform `Rejected`
    ///
    /// # Errors
    /// * `InvalidSecret` - Secret exceeds the maximum length
    /// * `StoreUnavailable` - Identity store failed during lookup
    /// * `Integrity` - Stored credential hash is corrupted
    async fn authenticate(
        &self,
        command: LoginCommand,
    ) -> Result<AuthenticationOutcome, IdentityError>;

    /// Verify a credential and issue an assertion.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown identifier or wrong secret
    /// * `StoreUnavailable` - Identity store failed during lookup
    /// * `Integrity` - Stored credential hash is corrupted
    /// * `TokenIssuance` - Signing the assertion failed
    async fn login(&self, command: LoginCommand) -> Result<Session, IdentityError>;

    /// Validate an assertion presented on an inbound request.
    ///
    /// # Returns
    /// Identifier the assertion was issued for
    ///
    /// # Errors
    /// * `TokenExpired` - Assertion is authentic but expired
    /// * `TokenInvalid` - Tag mismatch or malformed assertion
    fn validate_assertion(&self, token: &str) -> Result<Identifier, IdentityError>;
}

/// Persistence operations for identity records.
#[async_trait]
pub trait IdentityRepository: Send + Sync + 'static {
    /// Persist a record unless its identifier already exists.
    ///
    /// Atomic: of two concurrent calls with the same identifier exactly one
    /// succeeds, and a failed call leaves nothing behind.
    ///
    /// # Errors
    /// * `Conflict` - Identifier already present
    /// * `Unavailable` - Underlying store failed
    async fn create_if_absent(&self, record: &IdentityRecord) -> Result<(), StoreError>;

    /// Retrieve a record by normalized identifier.
    ///
    /// # Returns
    /// Optional record (None if not found)
    ///
    /// # Errors
    /// * `Unavailable` - Underlying store failed
    /// * `Corrupted` - Stored row could not be decoded
    async fn find_by_identifier(
        &self,
        identifier: &Identifier,
    ) -> Result<Option<IdentityRecord>, StoreError>;
}
