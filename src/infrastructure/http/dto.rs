//! Data Transfer Objects

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::{BookPage, CatalogRef};
use crate::domain::{Author, Book, Description, Publisher};

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

/// 空数据响应
#[derive(Debug, Serialize)]
pub struct Empty {}

impl ApiResponse<Empty> {
    /// 成功但无数据
    pub fn ok() -> Self {
        Self::success(Empty {})
    }
}

// ============================================================================
// Query parameters
// ============================================================================

/// 分页参数保持字符串，无法解析时按不分页处理
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
    pub per_page: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListBooksParams {
    pub page: Option<String>,
    pub per_page: Option<String>,
    pub sort_key: Option<String>,
    pub status: Option<String>,
    pub isbn: Option<String>,
    /// 书名 / 作者名 / 出版社名 模糊搜索
    pub book: Option<String>,
}

// ============================================================================
// Book DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateBookRequest {
    pub title: String,
    pub isbn: Option<String>,
    pub author_id: Option<i64>,
    pub author_name: Option<String>,
    pub publisher_id: Option<i64>,
    pub publisher_name: Option<String>,
    pub small_image_url: Option<String>,
    pub medium_image_url: Option<String>,
    pub item_url: Option<String>,
    pub affiliate_url: Option<String>,
}

impl CreateBookRequest {
    pub fn author_ref(&self) -> Option<CatalogRef> {
        catalog_ref(self.author_id, self.author_name.as_deref())
    }

    pub fn publisher_ref(&self) -> Option<CatalogRef> {
        catalog_ref(self.publisher_id, self.publisher_name.as_deref())
    }
}

/// ID 优先；名称为空白时视为未提供
fn catalog_ref(id: Option<i64>, name: Option<&str>) -> Option<CatalogRef> {
    match (id, name.map(str::trim)) {
        (Some(id), _) => Some(CatalogRef::Id(id)),
        (None, Some(name)) if !name.is_empty() => Some(CatalogRef::Name(name.to_string())),
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateBookRequest {
    pub id: i64,
    pub title: String,
    pub author_id: Option<i64>,
    pub publisher_id: Option<i64>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct BookResponse {
    pub id: i64,
    pub title: String,
    pub isbn: Option<String>,
    pub author: Option<Author>,
    pub publisher: Option<Publisher>,
    pub read_state: &'static str,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub descriptions: Vec<Description>,
    pub small_image_url: Option<String>,
    pub medium_image_url: Option<String>,
    pub item_url: Option<String>,
    pub affiliate_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            read_state: book.read_state().as_str(),
            start_at: book.progress.start_at(),
            end_at: book.progress.end_at(),
            title: book.title,
            isbn: book.isbn,
            author: book.author,
            publisher: book.publisher,
            descriptions: book.descriptions,
            small_image_url: book.small_image_url,
            medium_image_url: book.medium_image_url,
            item_url: book.item_url,
            affiliate_url: book.affiliate_url,
            created_at: book.created_at,
            updated_at: book.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookListResponse {
    pub books: Vec<BookResponse>,
    pub total_count: i64,
}

impl From<BookPage> for BookListResponse {
    fn from(page: BookPage) -> Self {
        Self {
            books: page.books.into_iter().map(BookResponse::from).collect(),
            total_count: page.total_count,
        }
    }
}

// ============================================================================
// Description / Catalog DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateDescriptionRequest {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateCatalogRequest {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_ref_prefers_id() {
        assert_eq!(
            catalog_ref(Some(3), Some("Alice")),
            Some(CatalogRef::Id(3))
        );
        assert_eq!(
            catalog_ref(None, Some(" Alice ")),
            Some(CatalogRef::Name("Alice".to_string()))
        );
        assert_eq!(catalog_ref(None, Some("   ")), None);
        assert_eq!(catalog_ref(None, None), None);
    }

    #[test]
    fn test_envelope_shape() {
        let json = serde_json::to_value(ApiResponse::ok()).unwrap();
        assert_eq!(json["errno"], 0);
        assert_eq!(json["error"], "");
        assert!(json["data"].is_object());
    }
}
