//! Postgres refresh token 台账实现

use crate::error::StorageError;
use crate::models::RefreshTokenRecord;
use crate::traits::RefreshTokenStore;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

pub struct PgRefreshTokenStore {
    pub pool: PgPool,
}

impl PgRefreshTokenStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn record_from_row(row: &PgRow) -> Result<RefreshTokenRecord, StorageError> {
    let expires_at: i64 = row.try_get("expires_at")?;
    Ok(RefreshTokenRecord {
        token: row.try_get("token")?,
        user_id: row.try_get("user_id")?,
        token_type: row.try_get("token_type")?,
        expires_at: u64::try_from(expires_at).unwrap_or_default(),
    })
}

fn epoch_to_db(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait::async_trait]
impl RefreshTokenStore for PgRefreshTokenStore {
    async fn insert_refresh_token(&self, record: RefreshTokenRecord) -> Result<(), StorageError> {
        sqlx::query(
            "insert into refresh_tokens (token, user_id, token_type, expires_at) values ($1, $2, $3, $4)",
        )
        .bind(&record.token)
        .bind(record.user_id)
        .bind(&record.token_type)
        .bind(epoch_to_db(record.expires_at))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_refresh_token(
        &self,
        token: &str,
    ) -> Result<Option<RefreshTokenRecord>, StorageError> {
        let row = sqlx::query(
            "select token, user_id, token_type, expires_at from refresh_tokens where token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(record_from_row).transpose()
    }

    async fn delete_refresh_token(&self, token: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("delete from refresh_tokens where token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn take_refresh_token(
        &self,
        token: &str,
    ) -> Result<Option<RefreshTokenRecord>, StorageError> {
        let row = sqlx::query(
            "delete from refresh_tokens where token = $1 \
             returning token, user_id, token_type, expires_at",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(record_from_row).transpose()
    }

    async fn delete_refresh_tokens_for_user(&self, user_id: i64) -> Result<u64, StorageError> {
        let result = sqlx::query("delete from refresh_tokens where user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
