//! Description HTTP Handlers

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Extension, Json,
};
use std::sync::Arc;

use super::{json_body, parse_id};
use crate::application::{CreateDescription, DeleteDescription, ListDescriptions, Pagination};
use crate::domain::{AccountId, Description};
use crate::infrastructure::http::dto::{ApiResponse, CreateDescriptionRequest, Empty, PageParams};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 列出书籍笔记
pub async fn list_descriptions(
    State(state): State<Arc<AppState>>,
    Extension(account_id): Extension<AccountId>,
    Path(id): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Json<ApiResponse<Vec<Description>>>, ApiError> {
    let book_id = parse_id(&id)?;
    let descriptions = state
        .list_descriptions_handler
        .handle(ListDescriptions {
            account_id,
            book_id,
            pagination: Pagination::from_params(
                params.page.as_deref(),
                params.per_page.as_deref(),
            ),
        })
        .await?;

    Ok(Json(ApiResponse::success(descriptions)))
}

/// 添加笔记
pub async fn create_description(
    State(state): State<Arc<AppState>>,
    Extension(account_id): Extension<AccountId>,
    Path(id): Path<String>,
    payload: Result<Json<CreateDescriptionRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Description>>, ApiError> {
    let book_id = parse_id(&id)?;
    let request = json_body(payload)?;

    let description = state
        .create_description_handler
        .handle(CreateDescription {
            account_id,
            book_id,
            content: request.content,
        })
        .await?;

    Ok(Json(ApiResponse::success(description)))
}

/// 删除笔记
pub async fn delete_description(
    State(state): State<Arc<AppState>>,
    Extension(account_id): Extension<AccountId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    let description_id = parse_id(&id)?;
    state
        .delete_description_handler
        .handle(DeleteDescription {
            account_id,
            description_id,
        })
        .await?;

    Ok(Json(ApiResponse::ok()))
}
