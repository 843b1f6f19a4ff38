//! HTTP Middleware
//!
//! - 错误日志中间件
//! - Bearer token 身份校验中间件

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use super::error::ApiError;
use super::state::AppState;

/// HTTP 状态码错误日志中间件
///
/// 拦截 HTTP 响应，当状态码为 4xx 或 5xx 时记录日志
/// 注意：业务错误（errno != 0）在 ApiError::into_response() 中记录
pub async fn error_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;
    let status = response.status();

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            "HTTP server error"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            "HTTP client error"
        );
    }

    response
}

/// 从 `Authorization: Bearer <token>` 取出凭证，缺失时为空串
fn bearer_token(request: &Request) -> &str {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer ").or_else(|| v.strip_prefix("bearer ")))
        .map(str::trim)
        .unwrap_or_default()
}

/// 身份校验中间件
///
/// 校验通过后把 `AccountId` 放入请求扩展，处理器通过 `Extension<AccountId>` 取用
pub async fn require_account(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&request).to_string();
    let account_id = state.identity_verifier.verify(&token).await?;

    tracing::debug!(account_id = %account_id, "Request authenticated");

    request.extensions_mut().insert(account_id);
    Ok(next.run(request).await)
}
