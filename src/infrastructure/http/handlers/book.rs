//! Book HTTP Handlers

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Extension, Json,
};
use std::sync::Arc;

use super::{json_body, parse_id};
use crate::application::{
    CreateBook, DeleteBook, GetBook, GetSharedBook, ListBooks, Pagination, SharedBook,
    ToggleReadState, UpdateBook,
};
use crate::domain::AccountId;
use crate::infrastructure::http::dto::{
    ApiResponse, BookListResponse, BookResponse, CreateBookRequest, Empty, ListBooksParams,
    UpdateBookRequest,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 列出书籍
pub async fn list_books(
    State(state): State<Arc<AppState>>,
    Extension(account_id): Extension<AccountId>,
    Query(params): Query<ListBooksParams>,
) -> Result<Json<ApiResponse<BookListResponse>>, ApiError> {
    let query = ListBooks {
        account_id,
        isbn: params.isbn,
        status: params.status,
        search: params.book,
        pagination: Pagination::from_params(params.page.as_deref(), params.per_page.as_deref()),
        sort_key: params.sort_key,
    };

    let page = state.list_books_handler.handle(query).await?;
    Ok(Json(ApiResponse::success(BookListResponse::from(page))))
}

/// 获取书籍（含笔记）
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    Extension(account_id): Extension<AccountId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<BookResponse>>, ApiError> {
    let book_id = parse_id(&id)?;
    let book = state
        .get_book_handler
        .handle(GetBook {
            account_id,
            book_id,
        })
        .await?;

    Ok(Json(ApiResponse::success(BookResponse::from(book))))
}

/// 分享视图（无需认证）
pub async fn get_shared_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<SharedBook>>, ApiError> {
    let book_id = parse_id(&id)?;
    let book = state
        .get_shared_book_handler
        .handle(GetSharedBook { book_id })
        .await?;

    Ok(Json(ApiResponse::success(book)))
}

/// 创建书籍
pub async fn create_book(
    State(state): State<Arc<AppState>>,
    Extension(account_id): Extension<AccountId>,
    payload: Result<Json<CreateBookRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<BookResponse>>, ApiError> {
    let request = json_body(payload)?;

    let command = CreateBook {
        account_id,
        author: request.author_ref(),
        publisher: request.publisher_ref(),
        title: request.title,
        isbn: request.isbn.filter(|isbn| !isbn.trim().is_empty()),
        small_image_url: request.small_image_url,
        medium_image_url: request.medium_image_url,
        item_url: request.item_url,
        affiliate_url: request.affiliate_url,
    };

    let book = state.create_book_handler.handle(command).await?;
    Ok(Json(ApiResponse::success(BookResponse::from(book))))
}

/// 更新书籍，阅读状态由 start_at / end_at 推导
pub async fn update_book(
    State(state): State<Arc<AppState>>,
    Extension(account_id): Extension<AccountId>,
    payload: Result<Json<UpdateBookRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<BookResponse>>, ApiError> {
    let request = json_body(payload)?;

    let command = UpdateBook {
        account_id,
        book_id: request.id,
        title: request.title,
        author_id: request.author_id,
        publisher_id: request.publisher_id,
        start_at: request.start_at,
        end_at: request.end_at,
    };

    let book = state.update_book_handler.handle(command).await?;
    Ok(Json(ApiResponse::success(BookResponse::from(book))))
}

/// 删除书籍及其笔记
pub async fn delete_book(
    State(state): State<Arc<AppState>>,
    Extension(account_id): Extension<AccountId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    let book_id = parse_id(&id)?;
    state
        .delete_book_handler
        .handle(DeleteBook {
            account_id,
            book_id,
        })
        .await?;

    Ok(Json(ApiResponse::ok()))
}

/// 切换阅读状态（/state/start 与 /state/end 共用）
pub async fn toggle_read_state(
    State(state): State<Arc<AppState>>,
    Extension(account_id): Extension<AccountId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<BookResponse>>, ApiError> {
    let book_id = parse_id(&id)?;
    let book = state
        .toggle_read_state_handler
        .handle(ToggleReadState {
            account_id,
            book_id,
        })
        .await?;

    Ok(Json(ApiResponse::success(BookResponse::from(book))))
}
