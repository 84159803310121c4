//! Refresh-token store contract and its Postgres implementation

use crate::{error::AppError, models::token::RefreshToken};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// Storage contract for opaque refresh tokens.
///
/// Lookups return `Ok(None)` for absent rows; storage failures are the
/// only error path. Expiry interpretation belongs to the caller, not
/// the store.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    async fn create(
        &self,
        user_id: i64,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError>;

    async fn find_by_value(&self, token: &str) -> Result<Option<RefreshToken>, AppError>;
}

pub struct PgRefreshTokenStore {
    db: PgPool,
}

impl PgRefreshTokenStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RefreshTokenStore for PgRefreshTokenStore {
    async fn create(
        &self,
        user_id: i64,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (user_id, token, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(user_id)
        .bind(token)
        .bind(expires_at)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn find_by_value(&self, token: &str) -> Result<Option<RefreshToken>, AppError> {
        let record =
            sqlx::query_as::<_, RefreshToken>("SELECT * FROM refresh_tokens WHERE token = $1")
                .bind(token)
                .fetch_optional(&self.db)
                .await?;

        Ok(record)
    }
}
