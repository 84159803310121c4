//! 用户服务：注册、登录校验、用户列表

use crate::{
    auth::jwt::JwtService,
    auth::password::PasswordHasher,
    error::AppError,
    models::user::User,
    repository::user_repo::UserRepository,
    services::token_service::TokenService,
};
use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;

/// 注册成功后发放的全部凭据
#[derive(Debug)]
pub struct IssuedTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub refresh_expires_at: chrono::DateTime<Utc>,
}

pub struct UserService {
    db: PgPool,
    jwt_service: Arc<JwtService>,
    token_service: Arc<TokenService>,
}

impl UserService {
    pub fn new(db: PgPool, jwt_service: Arc<JwtService>, token_service: Arc<TokenService>) -> Self {
        Self {
            db,
            jwt_service,
            token_service,
        }
    }

    /// 注册新用户
    ///
    /// 哈希密码、创建账户、铸造刷新令牌并签发访问令牌。邮箱唯一性
    /// 冲突由存储层报告，这里不做预检查。
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<IssuedTokens, AppError> {
        let hasher = PasswordHasher::new();
        let password_hash = hasher.hash(password)?;

        let user_repo = UserRepository::new(self.db.clone());
        let user = user_repo.create(email, &password_hash).await?;

        let now = Utc::now();
        let minted = self.token_service.issue_for_user(user.id, now).await?;
        let access_token = self.jwt_service.issue(user.id, now)?;

        tracing::info!(user_id = user.id, "User signed up");

        Ok(IssuedTokens {
            access_token,
            refresh_token: minted.token,
            refresh_expires_at: minted.expires_at,
        })
    }

    /// 校验登录凭据
    ///
    /// 未知邮箱和错误密码对调用方是同一种失败。
    pub async fn check_sign_in(&self, email: &str, password: &str) -> Result<(), AppError> {
        let user_repo = UserRepository::new(self.db.clone());

        let user: User = user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::Unauthorized)?;

        let hasher = PasswordHasher::new();
        hasher.verify(password, &user.password_hash)
    }

    /// 列出所有用户
    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let user_repo = UserRepository::new(self.db.clone());
        user_repo.list().await
    }
}
