//! 认证中间件：Basic / API-Key / Bearer(JWT) 三种网关
//!
//! 每个网关都是单次转换的过滤器：检查凭据，然后放行或以统一的
//! 401/500 短路。网关之间互不组合，一个路由组只挂一种网关，
//! 网关自身不保存任何跨请求状态。

use crate::{
    auth::api_key::{check_api_key, ApiKeyOutcome},
    auth::basic::check_basic_credentials,
    auth::jwt::JwtService,
    config::SecurityConfig,
    error::AppError,
    middleware::AppState,
};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use chrono::Utc;
use secrecy::ExposeSecret;
use std::sync::Arc;

/// API Key 所在的请求头
pub const API_KEY_HEADER: &str = "api-key";

/// 单个网关的判定结果
///
/// 所有方案特有的输入都先归约到这个和类型，再决定放行或短路。
/// 只有 JWT 网关能证明调用者身份，其余网关 `user_id` 为 None。
#[derive(Debug)]
pub enum AuthOutcome {
    Allowed { user_id: Option<i64> },
    Denied(AppError),
}

/// 认证上下文（附加到请求扩展）
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: i64,
}

// 实现 FromRequestParts 以便在 handler 中直接提取 AuthContext
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// 从 Authorization 头的值中提取 Bearer 令牌
///
/// 必须恰好是两个以空格分隔的部分，且第一部分是字面量 "Bearer"。
/// 纯解析函数，没有任何 I/O。
pub fn extract_bearer(header_value: &str) -> Result<&str, AppError> {
    let mut parts = header_value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) => Ok(token),
        _ => Err(AppError::Unauthorized),
    }
}

/// Basic 认证网关
pub async fn basic_auth_middleware(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    match check_basic_gate(req.headers(), &state.config.security) {
        AuthOutcome::Allowed { .. } => Ok(next.run(req).await),
        AuthOutcome::Denied(e) => Err(e),
    }
}

fn check_basic_gate(headers: &HeaderMap, security: &SecurityConfig) -> AuthOutcome {
    let Some((username, password)) = decode_basic_header(headers) else {
        return AuthOutcome::Denied(AppError::Unauthorized);
    };

    if check_basic_credentials(
        &username,
        &password,
        security.basic_auth_username.expose_secret(),
        security.basic_auth_password.expose_secret(),
    ) {
        AuthOutcome::Allowed { user_id: None }
    } else {
        AuthOutcome::Denied(AppError::Unauthorized)
    }
}

/// 解析 `Authorization: Basic <base64(user:pass)>`
fn decode_basic_header(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let encoded = value.strip_prefix("Basic ")?;
    let decoded = BASE64_STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

/// API-Key 认证网关
pub async fn api_key_auth_middleware(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    match check_api_key_gate(req.headers(), &state.config.security) {
        AuthOutcome::Allowed { .. } => Ok(next.run(req).await),
        AuthOutcome::Denied(e) => Err(e),
    }
}

fn check_api_key_gate(headers: &HeaderMap, security: &SecurityConfig) -> AuthOutcome {
    let submitted = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    match check_api_key(submitted, security.api_key.expose_secret()) {
        ApiKeyOutcome::Authorized => AuthOutcome::Allowed { user_id: None },
        ApiKeyOutcome::Unauthorized => AuthOutcome::Denied(AppError::Unauthorized),
        ApiKeyOutcome::Misconfigured => {
            tracing::warn!("API key auth requested but no key is configured");
            AuthOutcome::Denied(AppError::Config("API key is not configured".to_string()))
        }
    }
}

/// JWT 认证网关
pub async fn jwt_auth_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    match check_jwt_gate(req.headers(), &state.jwt_service) {
        AuthOutcome::Allowed { user_id } => {
            if let Some(user_id) = user_id {
                req.extensions_mut().insert(AuthContext { user_id });
            }
            Ok(next.run(req).await)
        }
        AuthOutcome::Denied(e) => Err(e),
    }
}

fn check_jwt_gate(headers: &HeaderMap, jwt_service: &JwtService) -> AuthOutcome {
    let Some(value) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    else {
        return AuthOutcome::Denied(AppError::Unauthorized);
    };

    let token = match extract_bearer(value) {
        Ok(token) => token,
        Err(e) => return AuthOutcome::Denied(e),
    };

    match jwt_service.validate(token, Utc::now()) {
        Ok(claims) => AuthOutcome::Allowed {
            user_id: Some(claims.user_id),
        },
        Err(e) => AuthOutcome::Denied(e.into()),
    }
}
