//! 用户相关的 HTTP 处理器

use crate::{
    error::AppError,
    handlers::token::refresh_cookie,
    middleware::AppState,
    models::user::{ListUsersResponse, SignInRequest, SignUpRequest, SignUpResponse, UserResponse},
};
use axum::{
    extract::State,
    http::header,
    response::{AppendHeaders, IntoResponse},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

/// 注册
///
/// 访问令牌放在响应体里；刷新令牌走 HttpOnly Cookie，限定到刷新
/// 端点路径。
pub async fn sign_up(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignUpRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(e) = req.validate() {
        tracing::debug!("Sign-up request failed validation: {}", e);
        return Err(AppError::BadRequest("Invalid request".to_string()));
    }

    let tokens = state.user_service.sign_up(&req.email, &req.password).await?;

    let cookie = refresh_cookie(&tokens.refresh_token, tokens.refresh_expires_at);

    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(SignUpResponse {
            access_token: tokens.access_token,
        }),
    ))
}

/// 登录校验
pub async fn sign_in(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignInRequest>,
) -> Result<impl IntoResponse, AppError> {
    match state
        .user_service
        .check_sign_in(&req.email, &req.password)
        .await
    {
        Ok(()) => Ok(Json(json!({"message": "Successfully signed in"}))),
        // 未知邮箱与错误密码对外是同一条消息
        Err(AppError::Unauthorized) => Err(AppError::BadRequest(
            "Invalid email or password".to_string(),
        )),
        Err(e) => Err(e),
    }
}

/// 列出所有用户
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ListUsersResponse>, AppError> {
    let users = state.user_service.list_users().await?;

    Ok(Json(ListUsersResponse {
        users: users.into_iter().map(UserResponse::from).collect(),
    }))
}
