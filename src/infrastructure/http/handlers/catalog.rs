//! Author / Publisher HTTP Handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use std::sync::Arc;

use super::json_body;
use crate::application::{
    CreateAuthor, CreatePublisher, ListCountedAuthors, ListCountedPublishers,
};
use crate::domain::{AccountId, Author, CountedAuthor, CountedPublisher, Publisher};
use crate::infrastructure::http::dto::{ApiResponse, CreateCatalogRequest};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 账户书籍引用到的作者及数量
pub async fn list_counted_authors(
    State(state): State<Arc<AppState>>,
    Extension(account_id): Extension<AccountId>,
) -> Result<Json<ApiResponse<Vec<CountedAuthor>>>, ApiError> {
    let authors = state
        .list_counted_authors_handler
        .handle(ListCountedAuthors { account_id })
        .await?;

    Ok(Json(ApiResponse::success(authors)))
}

/// 账户书籍引用到的出版社及数量
pub async fn list_counted_publishers(
    State(state): State<Arc<AppState>>,
    Extension(account_id): Extension<AccountId>,
) -> Result<Json<ApiResponse<Vec<CountedPublisher>>>, ApiError> {
    let publishers = state
        .list_counted_publishers_handler
        .handle(ListCountedPublishers { account_id })
        .await?;

    Ok(Json(ApiResponse::success(publishers)))
}

pub async fn create_author(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateCatalogRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Author>>, ApiError> {
    let request = json_body(payload)?;
    let author = state
        .create_author_handler
        .handle(CreateAuthor { name: request.name })
        .await?;

    Ok(Json(ApiResponse::success(author)))
}

pub async fn create_publisher(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateCatalogRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Publisher>>, ApiError> {
    let request = json_body(payload)?;
    let publisher = state
        .create_publisher_handler
        .handle(CreatePublisher { name: request.name })
        .await?;

    Ok(Json(ApiResponse::success(publisher)))
}
