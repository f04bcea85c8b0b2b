use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;

use crate::domain::identity::models::CredentialHash;
use crate::domain::identity::models::Identifier;
use crate::domain::identity::models::IdentityRecord;
use crate::domain::identity::ports::IdentityRepository;
use crate::identity::errors::StoreError;

pub struct PostgresIdentityRepository {
    pool: PgPool,
}

impl PostgresIdentityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct IdentityRow {
    identifier: String,
    credential_hash: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<IdentityRow> for IdentityRecord {
    type Error = StoreError;

    fn try_from(row: IdentityRow) -> Result<Self, Self::Error> {
        let identifier = Identifier::parse(&row.identifier)
            .map_err(|e| StoreError::Corrupted(format!("identifier: {}", e)))?;

        Ok(IdentityRecord {
            identifier,
            credential_hash: CredentialHash::new(row.credential_hash),
            created_at: row.created_at,
        })
    }
}

fn store_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            StoreError::Corrupted(err.to_string())
        }
        _ => StoreError::Unavailable(err.to_string()),
    }
}

#[async_trait]
impl IdentityRepository for PostgresIdentityRepository {
    async fn create_if_absent(&self, record: &IdentityRecord) -> Result<(), StoreError> {
        // The primary key on `identifier` makes the insert the uniqueness check.
        let result = sqlx::query(
            r#"
            INSERT INTO identities (identifier, credential_hash, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (identifier) DO NOTHING
            "#,
        )
        .bind(record.identifier.as_str())
        .bind(record.credential_hash.expose())
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict);
        }

        Ok(())
    }

    async fn find_by_identifier(
        &self,
        identifier: &Identifier,
    ) -> Result<Option<IdentityRecord>, StoreError> {
        let row = sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT identifier, credential_hash, created_at
            FROM identities
            WHERE identifier = $1
            "#,
        )
        .bind(identifier.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        row.map(IdentityRecord::try_from).transpose()
    }
}
