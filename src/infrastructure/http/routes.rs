//! HTTP Routes
//!
//! API Endpoints:
//! - /health                                   GET     健康检查（无需认证）
//! - /share/book/:id                           GET     分享视图（无需认证）
//! - /books                                    GET     列出书籍（page, per_page, sort_key, status, isbn, book）
//! - /books                                    POST    创建书籍
//! - /books                                    PUT     更新书籍
//! - /book/:id                                 GET     获取书籍
//! - /book/:id                                 DELETE  删除书籍及笔记
//! - /book/:id/state/start, /book/:id/state/end PUT    切换阅读状态
//! - /book/:id/description                     GET     列出笔记
//! - /book/:id/description                     POST    添加笔记
//! - /description/:id                          DELETE  删除笔记
//! - /counted_authors, /counted_publisher      GET     作者 / 出版社及书籍数量
//! - /author, /publisher                       POST    创建作者 / 出版社
//! - /counted/author, /counted/publisher       GET     按名称计数
//! - /counted/date/:dimension/:granularity     GET     按日期分桶计数

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::middleware::require_account;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .merge(public_routes())
        .merge(protected_routes(state))
}

/// 无需认证的路由
fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/share/book/:id", get(handlers::get_shared_book))
}

/// 需要认证的路由
fn protected_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .merge(book_routes())
        .merge(catalog_routes())
        .merge(stats_routes())
        .layer(middleware::from_fn_with_state(state, require_account))
}

/// Book / Description 路由
fn book_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/books",
            get(handlers::list_books)
                .post(handlers::create_book)
                .put(handlers::update_book),
        )
        .route(
            "/book/:id",
            get(handlers::get_book).delete(handlers::delete_book),
        )
        .route("/book/:id/state/start", put(handlers::toggle_read_state))
        .route("/book/:id/state/end", put(handlers::toggle_read_state))
        .route(
            "/book/:id/description",
            get(handlers::list_descriptions).post(handlers::create_description),
        )
        .route("/description/:id", delete(handlers::delete_description))
}

/// Author / Publisher 路由
fn catalog_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/counted_authors", get(handlers::list_counted_authors))
        .route("/counted_publisher", get(handlers::list_counted_publishers))
        .route("/author", post(handlers::create_author))
        .route("/publisher", post(handlers::create_publisher))
}

/// 统计路由
fn stats_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/counted/author", get(handlers::count_by_author))
        .route("/counted/publisher", get(handlers::count_by_publisher))
        .route(
            "/counted/date/:dimension/:granularity",
            get(handlers::count_by_date),
        )
}
