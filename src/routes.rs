//! 路由注册
//! 三个认证方案各自一个路由组，互不叠加

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, middleware::AppState};

/// 创建应用路由
///
/// 一个请求按路由组落到且只落到一种认证网关上：
/// - /api/v1/basic/* — Basic 认证
/// - /api/v1/key/*   — API-Key 认证
/// - /api/v1/jwt/*   — Bearer/JWT 认证
pub fn create_router(state: Arc<AppState>) -> Router {
    // 公开端点（健康检查）
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check));

    // Basic 认证路由组
    let basic_routes = Router::new()
        .route("/api/v1/basic/users", get(handlers::user::list_users))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::auth::middleware::basic_auth_middleware,
        ));

    // API-Key 认证路由组（注册、登录、刷新）
    let key_routes = Router::new()
        .route("/api/v1/key/signup", post(handlers::user::sign_up))
        .route("/api/v1/key/signin", post(handlers::user::sign_in))
        .route("/api/v1/key/refresh", post(handlers::token::refresh))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::auth::middleware::api_key_auth_middleware,
        ));

    // JWT 认证路由组
    let jwt_routes = Router::new()
        .route("/api/v1/jwt/users", get(handlers::user::list_users))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::auth::middleware::jwt_auth_middleware,
        ));

    // 组合所有路由
    Router::new()
        .merge(public_routes)
        .merge(basic_routes)
        .merge(key_routes)
        .merge(jwt_routes)
        .layer(axum::middleware::from_fn(
            crate::middleware::request_tracking_middleware,
        ))
        .with_state(state)
}
