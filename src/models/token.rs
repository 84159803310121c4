//! Refresh-token domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored refresh token. Created once at sign-up, looked up by raw
/// token value on refresh requests, never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RefreshToken {
    pub id: i64,
    pub user_id: i64,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Token refresh request (body transport; the cookie transport is
/// handled by the endpoint adapter)
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Token refresh response
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
}
