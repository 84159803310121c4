//! 令牌相关的 HTTP 处理器

use crate::{
    error::AppError,
    middleware::AppState,
    models::token::{RefreshRequest, RefreshResponse},
    services::token_service::RefreshError,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// 刷新令牌使用的 Cookie 名
pub const REFRESH_COOKIE: &str = "refresh_token";

/// 刷新令牌 Cookie 限定的路径
pub const REFRESH_COOKIE_PATH: &str = "/api/v1/key/refresh";

/// 换发访问令牌
///
/// 刷新令牌从 JSON body 或同名 Cookie 中取出（两种部署形态的传输
/// 适配都在这里，核心校验逻辑不关心来源）。未知或过期的令牌统一
/// 返回 400，不区分原因。
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let token_value = body
        .ok()
        .map(|Json(req)| req.refresh_token)
        .or_else(|| cookie_value(&headers, REFRESH_COOKIE))
        .ok_or_else(|| AppError::BadRequest("bad request".to_string()))?;

    match state
        .token_service
        .refresh_access_token(&token_value, Utc::now())
        .await
    {
        Ok(access_token) => Ok(Json(RefreshResponse { access_token })),
        Err(RefreshError::NotFound) | Err(RefreshError::Expired) => {
            // 令牌不存在与已过期对外不可区分
            tracing::debug!("Refresh token rejected");
            Err(AppError::BadRequest("bad request".to_string()))
        }
        Err(RefreshError::App(e)) => Err(e),
    }
}

/// 从 Cookie 头中取出指定名称的值
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(header::COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .find_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key == name).then(|| value.to_string())
        })
}

/// 构造刷新令牌的 Set-Cookie 值
///
/// HttpOnly + SameSite=Strict，路径限定到刷新端点。
pub fn refresh_cookie(token: &str, expires_at: DateTime<Utc>) -> String {
    format!(
        "{}={}; Path={}; Expires={}; HttpOnly; SameSite=Strict",
        REFRESH_COOKIE,
        token,
        REFRESH_COOKIE_PATH,
        expires_at.format("%a, %d %b %Y %H:%M:%S GMT"),
    )
}
