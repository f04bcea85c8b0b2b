use std::collections::hash_map::Entry;
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::identity::models::Identifier;
use crate::domain::identity::models::IdentityRecord;
use crate::domain::identity::ports::IdentityRepository;
use crate::identity::errors::StoreError;

/// Identity store held in process memory.
///
/// Records live as long as the value. Insertion happens under the write lock,
/// so the absence check and the insert are one atomic step.
#[derive(Default)]
pub struct InMemoryIdentityRepository {
    records: RwLock<HashMap<Identifier, IdentityRecord>>,
}

impl InMemoryIdentityRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl IdentityRepository for InMemoryIdentityRepository {
    async fn create_if_absent(&self, record: &IdentityRecord) -> Result<(), StoreError> {
        let mut records = self.records.write().await;

        match records.entry(record.identifier.clone()) {
            Entry::Occupied(_) => Err(StoreError::Conflict),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(())
            }
        }
    }

    async fn find_by_identifier(
        &self,
        identifier: &Identifier,
    ) -> Result<Option<IdentityRecord>, StoreError> {
        Ok(self.records.read().await.get(identifier).cloned())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;

    use super::*;
    use crate::domain::identity::models::CredentialHash;

    fn record(identifier: &str, hash: &str) -> IdentityRecord {
        IdentityRecord {
            identifier: Identifier::parse(identifier).unwrap(),
            credential_hash: CredentialHash::new(hash.to_string()),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repository = InMemoryIdentityRepository::new();

        repository
            .create_if_absent(&record("a@x.com", "$argon2id$first"))
            .await
            .unwrap();

        let found = repository
            .find_by_identifier(&Identifier::parse("a@x.com").unwrap())
            .await
            .unwrap()
            .expect("record should exist");
        assert_eq!(found.identifier.as_str(), "a@x.com");
        assert_eq!(found.credential_hash.expose(), "$argon2id$first");
    }

    #[tokio::test]
    async fn test_find_missing_is_none() {
        let repository = InMemoryIdentityRepository::new();

        let found = repository
            .find_by_identifier(&Identifier::parse("nobody@x.com").unwrap())
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_conflict_keeps_original_record() {
        let repository = InMemoryIdentityRepository::new();

        repository
            .create_if_absent(&record("a@x.com", "$argon2id$first"))
            .await
            .unwrap();
        let second = repository
            .create_if_absent(&record("A@X.com", "$argon2id$second"))
            .await;

        assert_eq!(second, Err(StoreError::Conflict));
        assert_eq!(repository.len().await, 1);

        let found = repository
            .find_by_identifier(&Identifier::parse("a@x.com").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.credential_hash.expose(), "$argon2id$first");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_have_single_winner() {
        let repository = Arc::new(InMemoryIdentityRepository::new());

        let attempts = (0..16).map(|i| {
            let repository = Arc::clone(&repository);
            tokio::spawn(async move {
                repository
                    .create_if_absent(&record("race@x.com", &format!("$argon2id${}", i)))
                    .await
            })
        });

        let results: Vec<_> = futures::future::join_all(attempts)
            .await
            .into_iter()
            .map(|joined| joined.expect("task panicked"))
            .collect();

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(
            results
                .iter()
                .filter(|r| matches!(r, Err(StoreError::Conflict)))
                .count(),
            15
        );
        assert_eq!(repository.len().await, 1);
    }
}
