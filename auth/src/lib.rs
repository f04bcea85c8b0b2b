//! Credential utilities library
//!
//! Provides the cryptographic half of the credential lifecycle:
//! - Password hashing (Argon2id, configurable cost, constant-time verification)
//! - Identity assertions (HS256 JWT issuance and validation)
//! - Authentication coordination (timing-safe verification of unknown identities)
//!
//! Persistence and identifier rules live in the service that uses this crate.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::default();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Assertions
//! ```
//! use auth::TokenIssuer;
//! use chrono::Duration;
//!
//! let issuer = TokenIssuer::new(b"secret_key_at_least_32_bytes_long!", "identity-service", Duration::hours(24));
//! let assertion = issuer.issue("a@x.com").unwrap();
//! let claims = issuer.validate(&assertion.token).unwrap();
//! assert_eq!(claims.sub, "a@x.com");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::Authenticator;
pub use jwt::Assertion;
pub use jwt::Claims;
pub use jwt::TokenError;
pub use jwt::TokenIssuer;
pub use password::HashCost;
pub use password::PasswordError;
pub use password::PasswordHasher;
