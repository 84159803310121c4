//! 刷新令牌服务：铸造、校验、换发访问令牌

use crate::{
    auth::jwt::JwtService,
    error::AppError,
    models::token::RefreshToken,
    repository::token_repo::RefreshTokenStore,
};
use chrono::{DateTime, Duration, Utc};
use rand::{rngs::OsRng, RngCore};
use std::sync::Arc;
use thiserror::Error;

/// 刷新流程的失败原因
///
/// NotFound/Expired 在 HTTP 层折叠为同一个对外响应；存储层故障
/// 单独保留并向上传播。
#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("refresh token not found")]
    NotFound,

    #[error("refresh token expired")]
    Expired,

    #[error(transparent)]
    App(#[from] AppError),
}

/// 新铸造的刷新令牌（尚未含数据库分配的 id）
#[derive(Debug, Clone)]
pub struct MintedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

pub struct TokenService {
    store: Arc<dyn RefreshTokenStore>,
    jwt_service: Arc<JwtService>,
    refresh_token_exp_secs: u64,
}

impl TokenService {
    pub fn new(
        store: Arc<dyn RefreshTokenStore>,
        jwt_service: Arc<JwtService>,
        refresh_token_exp_secs: u64,
    ) -> Self {
        Self {
            store,
            jwt_service,
            refresh_token_exp_secs,
        }
    }

    /// 铸造一个新的刷新令牌：32 字节系统熵，hex 编码为 64 字符
    pub fn mint(&self, now: DateTime<Utc>) -> MintedToken {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);

        MintedToken {
            token: hex::encode(bytes),
            expires_at: now + Duration::seconds(self.refresh_token_exp_secs as i64),
        }
    }

    /// 为用户铸造并持久化刷新令牌
    pub async fn issue_for_user(
        &self,
        user_id: i64,
        now: DateTime<Utc>,
    ) -> Result<MintedToken, AppError> {
        let minted = self.mint(now);
        self.store
            .create(user_id, &minted.token, minted.expires_at)
            .await?;
        Ok(minted)
    }

    /// 校验刷新令牌并返回存储记录
    ///
    /// 存储契约对"不存在"返回 None；空 token 值的记录同样按不存在
    /// 处理。过期判定为严格早于当前时刻。
    pub async fn verify_refresh_token(
        &self,
        token_value: &str,
        now: DateTime<Utc>,
    ) -> Result<RefreshToken, RefreshError> {
        let Some(record) = self.store.find_by_value(token_value).await? else {
            return Err(RefreshError::NotFound);
        };

        if record.token.is_empty() {
            return Err(RefreshError::NotFound);
        }

        if record.expires_at < now {
            return Err(RefreshError::Expired);
        }

        Ok(record)
    }

    /// 用有效的刷新令牌换发一个新的访问令牌
    ///
    /// 刷新令牌本身不轮换也不作废：同一令牌在固定过期时间之前可以
    /// 反复换发访问令牌。这是沿用的产品决策，改动前需要和相关方
    /// 确认（见 DESIGN.md）。
    pub async fn refresh_access_token(
        &self,
        token_value: &str,
        now: DateTime<Utc>,
    ) -> Result<String, RefreshError> {
        let record = self.verify_refresh_token(token_value, now).await?;

        let access_token = self.jwt_service.issue(record.user_id, now)?;

        tracing::debug!(user_id = record.user_id, "Access token reissued via refresh token");

        Ok(access_token)
    }
}
