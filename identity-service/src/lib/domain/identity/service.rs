use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::PasswordError;
use chrono::Utc;
use tokio::sync::Semaphore;

use crate::domain::identity::models::AuthenticationOutcome;
use crate::domain::identity::models::CredentialHash;
use crate::domain::identity::models::Identifier;
use crate::domain::identity::models::IdentityRecord;
use crate::domain::identity::models::LoginCommand;
use crate::domain::identity::models::RegisterCommand;
use crate::domain::identity::models::RejectionReason;
use crate::domain::identity::models::SecretPolicy;
use crate::domain::identity::models::Session;
use crate::identity::errors::IdentityError;
use crate::identity::ports::IdentityRepository;
use crate::identity::ports::IdentityServicePort;

/// Domain service implementation for the credential lifecycle.
///
/// Argon2 work runs on the blocking thread pool. At most `max_concurrent_hashes`
/// hashes or verifications run at once; further requests wait for a permit.
pub struct IdentityService<IR>
where
    IR: IdentityRepository,
{
    repository: Arc<IR>,
    authenticator: Arc<Authenticator>,
    policy: SecretPolicy,
    hashing_permits: Arc<Semaphore>,
}

impl<IR> IdentityService<IR>
where
    IR: IdentityRepository,
{
    /// Create a new identity service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Identity store adapter
    /// * `authenticator` - Password hasher and token issuer
    /// * `policy` - Secret length policy
    /// * `max_concurrent_hashes` - Upper bound on in-flight Argon2 computations
    pub fn new(
        repository: Arc<IR>,
        authenticator: Arc<Authenticator>,
        policy: SecretPolicy,
        max_concurrent_hashes: usize,
    ) -> Self {
        Self {
            repository,
            authenticator,
            policy,
            hashing_permits: Arc::new(Semaphore::new(max_concurrent_hashes.max(1))),
        }
    }

    async fn run_hashing<T, F>(&self, job: F) -> Result<T, IdentityError>
    where
        F: FnOnce(&Authenticator) -> Result<T, PasswordError> + Send + 'static,
        T: Send + 'static,
    {
        let _permit = Arc::clone(&self.hashing_permits)
            .acquire_owned()
            .await
            .map_err(|e| IdentityError::Unknown(e.to_string()))?;

        let authenticator = Arc::clone(&self.authenticator);
        tokio::task::spawn_blocking(move || job(&authenticator))
            .await
            .map_err(|e| IdentityError::Unknown(format!("Hashing task failed: {}", e)))?
            .map_err(IdentityError::from)
    }
}

#[async_trait]
impl<IR> IdentityServicePort for IdentityService<IR>
where
    IR: IdentityRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<Identifier, IdentityError> {
        let identifier = Identifier::parse(&command.identifier)?;
        self.policy.check(&command.secret)?;

        let secret = command.secret;
        let credential_hash = self
            .run_hashing(move |authenticator| authenticator.hash_password(&secret))
            .await?;

        let record = IdentityRecord {
            identifier,
            credential_hash: CredentialHash::new(credential_hash),
            created_at: Utc::now(),
        };

        if let Err(e) = self.repository.create_if_absent(&record).await {
            let err = IdentityError::from(e);
            match &err {
                IdentityError::DuplicateIdentity => tracing::info!(
                    identifier = %record.identifier,
                    "Registration rejected: identity already exists"
                ),
                _ => tracing::error!(
                    identifier = %record.identifier,
                    error = %err,
                    "Registration failed"
                ),
            }
            return Err(err);
        }

        tracing::info!(identifier = %record.identifier, "Identity registered");

        Ok(record.identifier)
    }

    async fn authenticate(
        &self,
        command: LoginCommand,
    ) -> Result<AuthenticationOutcome, IdentityError> {
        self.policy.check_upper_bound(&command.secret)?;

        // A malformed identifier cannot exist in the store; treat it as unknown.
        let record = match Identifier::parse(&command.identifier) {
            Ok(identifier) => self
                .repository
                .find_by_identifier(&identifier)
                .await
                .map_err(|e| {
                    tracing::error!(identifier = %identifier, error = %e, "Identity lookup failed");
                    IdentityError::from(e)
                })?,
            Err(_) => None,
        };

        let stored_hash = record
            .as_ref()
            .map(|r| r.credential_hash.expose().to_string());
        let secret = command.secret;
        let verified = self
            .run_hashing(move |authenticator| {
                authenticator.verify_password(&secret, stored_hash.as_deref())
            })
            .await
            .map_err(|e| {
                if let IdentityError::Integrity(msg) = &e {
                    tracing::error!(error = %msg, "Stored credential hash is corrupted");
                }
                e
            })?;

        match record {
            Some(record) if verified => {
                tracing::info!(identifier = %record.identifier, "Authentication succeeded");
                Ok(AuthenticationOutcome::Authenticated {
                    identifier: record.identifier,
                })
            }
            _ => {
                tracing::warn!("Authentication rejected");
                Ok(AuthenticationOutcome::Rejected(
                    RejectionReason::InvalidCredentials,
                ))
            }
        }
    }

    async fn login(&self, command: LoginCommand) -> Result<Session, IdentityError> {
        let identifier = match self.authenticate(command).await? {
            AuthenticationOutcome::Authenticated { identifier } => identifier,
            AuthenticationOutcome::Rejected(RejectionReason::InvalidCredentials) => {
                return Err(IdentityError::InvalidCredentials)
            }
        };

        let assertion = self.authenticator.issue_token(identifier.as_str())?;

        Ok(Session {
            identifier,
            token: assertion.token,
            issued_at: assertion.issued_at,
            expires_at: assertion.expires_at,
        })
    }

    fn validate_assertion(&self, token: &str) -> Result<Identifier, IdentityError> {
        let claims = self.authenticator.validate_token(token)?;
        Identifier::parse(&claims.sub).map_err(|_| IdentityError::TokenInvalid)
    }
}
