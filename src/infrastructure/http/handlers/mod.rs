//! HTTP Handlers

mod book;
mod catalog;
mod description;
mod health;
mod stats;

pub use book::*;
pub use catalog::*;
pub use description::*;
pub use health::*;
pub use stats::*;

use axum::extract::rejection::JsonRejection;
use axum::Json;

use super::error::ApiError;

/// 路径中的 ID 必须是正整数
pub(crate) fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::BadRequest(format!("invalid id: {raw}")))
}

/// JSON 请求体解析失败时同样返回统一错误格式
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}
