//! Statistics HTTP Handlers

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use std::sync::Arc;

use crate::application::{CountBooksByDate, CountBooksByName};
use crate::domain::{AccountId, CountedDate, CountedName};
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

async fn count_by_name(
    state: &AppState,
    account_id: AccountId,
    key: &str,
) -> Result<Json<ApiResponse<Vec<CountedName>>>, ApiError> {
    let counted = state
        .count_by_name_handler
        .handle(CountBooksByName {
            account_id,
            key: key.to_string(),
        })
        .await?;

    Ok(Json(ApiResponse::success(counted)))
}

/// 按作者名计数（前 20）
pub async fn count_by_author(
    State(state): State<Arc<AppState>>,
    Extension(account_id): Extension<AccountId>,
) -> Result<Json<ApiResponse<Vec<CountedName>>>, ApiError> {
    count_by_name(&state, account_id, "author").await
}

/// 按出版社名计数（前 20）
pub async fn count_by_publisher(
    State(state): State<Arc<AppState>>,
    Extension(account_id): Extension<AccountId>,
) -> Result<Json<ApiResponse<Vec<CountedName>>>, ApiError> {
    count_by_name(&state, account_id, "publisher").await
}

/// 按日期分桶计数
///
/// dimension: register | start | end，granularity: daily | monthly
pub async fn count_by_date(
    State(state): State<Arc<AppState>>,
    Extension(account_id): Extension<AccountId>,
    Path((dimension, granularity)): Path<(String, String)>,
) -> Result<Json<ApiResponse<Vec<CountedDate>>>, ApiError> {
    let counted = state
        .count_by_date_handler
        .handle(CountBooksByDate {
            account_id,
            dimension,
            granularity,
        })
        .await?;

    Ok(Json(ApiResponse::success(counted)))
}
