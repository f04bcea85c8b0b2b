use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::Error as PasswordHashError;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;

use super::errors::PasswordError;

/// Argon2id work factor.
///
/// Bounds the CPU and memory spent per hash or verification. Every concurrent
/// login holds `memory_kib` of memory for the duration of one verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    /// Memory cost in KiB (`m`)
    pub memory_kib: u32,
    /// Number of passes over memory (`t`)
    pub iterations: u32,
    /// Degree of parallelism (`p`)
    pub parallelism: u32,
}

impl Default for HashCost {
    /// OWASP baseline for Argon2id: 19 MiB, 2 iterations, 1 lane.
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

/// Password hashing implementation.
///
/// Produces salted Argon2id hashes in PHC string format and verifies
/// plaintext passwords against them in constant time.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    cost: HashCost,
    max_password_length: usize,
}

impl PasswordHasher {
    /// Default upper bound on password length, in characters.
    pub const DEFAULT_MAX_PASSWORD_LENGTH: usize = 128;

    /// Create a new password hasher.
    ///
    /// # Arguments
    /// * `cost` - Argon2id work factor used for new hashes
    /// * `max_password_length` - Longest accepted password, in characters
    ///
    /// # Errors
    /// * `InvalidParameters` - Cost is outside the ranges Argon2 accepts
    pub fn new(cost: HashCost, max_password_length: usize) -> Result<Self, PasswordError> {
        let params = Params::new(cost.memory_kib, cost.iterations, cost.parallelism, None)
            .map_err(|e| PasswordError::InvalidParameters(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            cost,
            max_password_length,
        })
    }

    /// Work factor applied to new hashes.
    pub fn cost(&self) -> HashCost {
        self.cost
    }

    /// Hash a plaintext password securely.
    ///
    /// A fresh random salt is drawn for every call, so hashing the same
    /// password twice yields two different strings that both verify.
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `EmptyPassword` - Password is empty
    /// * `PasswordTooLong` - Password exceeds the configured maximum
    /// * `HashingFailed` - Argon2 rejected the input
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        self.check_length(password)?;
        if password.is_empty() {
            return Err(PasswordError::EmptyPassword);
        }

        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// The digest is recomputed with the algorithm, version and cost embedded
    /// in `hash`, not with this hasher's cost, so hashes created under an older
    /// work factor keep verifying.
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `PasswordTooLong` - Password exceeds the configured maximum
    /// * `MalformedHash` - Stored hash cannot be parsed or is not an Argon2 hash
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        self.check_length(password)?;

        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| PasswordError::MalformedHash(e.to_string()))?;

        if parsed_hash.salt.is_none() || parsed_hash.hash.is_none() {
            return Err(PasswordError::MalformedHash(
                "missing salt or digest".to_string(),
            ));
        }

        match self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(()) => Ok(true),
            Err(PasswordHashError::Password) => Ok(false),
            Err(e) => Err(PasswordError::MalformedHash(e.to_string())),
        }
    }

    fn check_length(&self, password: &str) -> Result<(), PasswordError> {
        let length = password.chars().count();
        if length > self.max_password_length {
            Err(PasswordError::PasswordTooLong {
                max: self.max_password_length,
                actual: length,
            })
        } else {
            Ok(())
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
            cost: HashCost::default(),
            max_password_length: Self::DEFAULT_MAX_PASSWORD_LENGTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: HashCost = HashCost {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    };

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(TEST_COST, 64).expect("Failed to build hasher")
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = hasher();
        let password = "my_secure_password";

        let hash = hasher.hash(password).expect("Failed to hash password");

        assert!(hasher
            .verify(password, &hash)
            .expect("Failed to verify password"));
        assert!(!hasher
            .verify("wrong_password", &hash)
            .expect("Failed to verify password"));
    }

    #[test]
    fn test_hash_is_salted_per_call() {
        let hasher = hasher();

        let first = hasher.hash("correcthorse1").unwrap();
        let second = hasher.hash("correcthorse1").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("correcthorse1", &first).unwrap());
        assert!(hasher.verify("correcthorse1", &second).unwrap());
    }

    #[test]
    fn test_hash_embeds_algorithm_and_cost() {
        let hasher = hasher();
        let hash = hasher.hash("correcthorse1").unwrap();
        let cost = hasher.cost();

        assert!(hash.starts_with("$argon2id$v=19$"));
        assert!(hash.contains(&format!(
            "m={},t={},p={}",
            cost.memory_kib, cost.iterations, cost.parallelism
        )));
        assert_eq!(cost, TEST_COST);
    }

    #[test]
    fn test_verify_uses_cost_embedded_in_hash() {
        let old_hasher = hasher();
        let hash = old_hasher.hash("correcthorse1").unwrap();

        let new_hasher = PasswordHasher::new(
            HashCost {
                memory_kib: 2048,
                iterations: 2,
                parallelism: 1,
            },
            64,
        )
        .unwrap();

        assert!(new_hasher.verify("correcthorse1", &hash).unwrap());
        assert!(!new_hasher.verify("correcthorse2", &hash).unwrap());
    }

    #[test]
    fn test_hash_rejects_empty_password() {
        assert_eq!(hasher().hash(""), Err(PasswordError::EmptyPassword));
    }

    #[test]
    fn test_hash_rejects_oversized_password() {
        let password = "a".repeat(65);

        assert_eq!(
            hasher().hash(&password),
            Err(PasswordError::PasswordTooLong {
                max: 64,
                actual: 65
            })
        );
    }

    #[test]
    fn test_verify_invalid_hash() {
        let result = hasher().verify("password", "invalid_hash");
        assert!(matches!(result, Err(PasswordError::MalformedHash(_))));
    }

    #[test]
    fn test_verify_hash_without_digest() {
        let result = hasher().verify("password", "$argon2id$v=19$m=1024,t=1,p=1");
        assert!(matches!(result, Err(PasswordError::MalformedHash(_))));
    }

    #[test]
    fn test_verify_unsupported_algorithm() {
        let result = hasher().verify(
            "password",
            "$pbkdf2-sha256$i=1000$c2FsdHNhbHQ$ZGlnZXN0ZGlnZXN0ZGlnZXN0",
        );
        assert!(matches!(result, Err(PasswordError::MalformedHash(_))));
    }

    #[test]
    fn test_invalid_cost_is_rejected() {
        let result = PasswordHasher::new(
            HashCost {
                memory_kib: 1,
                iterations: 0,
                parallelism: 1,
            },
            64,
        );
        assert!(matches!(result, Err(PasswordError::InvalidParameters(_))));
    }
}
