//! Book Query Handlers

use serde::Serialize;
use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{BookPage, BookQuery, BookRepositoryPort, Filter, SortKey};
use crate::application::queries::{GetBook, GetSharedBook, ListBooks};
use crate::domain::{Author, Book, Description, Publisher, ReadState};

// ============================================================================
// Response DTOs
// ============================================================================

/// 分享视图：不含账户与阅读进度
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharedBook {
    pub id: i64,
    pub title: String,
    pub isbn: Option<String>,
    pub author: Option<Author>,
    pub publisher: Option<Publisher>,
    pub descriptions: Vec<Description>,
    pub small_image_url: Option<String>,
    pub medium_image_url: Option<String>,
    pub item_url: Option<String>,
    pub affiliate_url: Option<String>,
}

impl From<Book> for SharedBook {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            isbn: book.isbn,
            author: book.author,
            publisher: book.publisher,
            descriptions: book.descriptions,
            small_image_url: book.small_image_url,
            medium_image_url: book.medium_image_url,
            item_url: book.item_url,
            affiliate_url: book.affiliate_url,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ============================================================================
// Handlers
// ============================================================================

/// ListBooks Handler
pub struct ListBooksHandler {
    book_repo: Arc<dyn BookRepositoryPort>,
}

impl ListBooksHandler {
    pub fn new(book_repo: Arc<dyn BookRepositoryPort>) -> Self {
        Self { book_repo }
    }

    pub async fn handle(&self, query: ListBooks) -> Result<BookPage, ApplicationError> {
        let sort_key = query.sort_key.unwrap_or_default();
        let sort = SortKey::parse(sort_key.trim())
            .ok_or_else(|| ApplicationError::validation(format!("invalid sort key: {sort_key}")))?;

        let mut filter = Filter::new().by_account_id(&query.account_id);
        if let Some(status) = non_empty(query.status) {
            filter = filter.by_status(ReadState::parse(status.trim())?);
        }
        if let Some(isbn) = non_empty(query.isbn) {
            filter = filter.by_isbn(isbn);
        }
        if let Some(term) = non_empty(query.search) {
            filter = filter.by_search(term);
        }

        let page = self
            .book_repo
            .find_all(BookQuery {
                filter,
                pagination: query.pagination,
                sort,
            })
            .await?;

        tracing::debug!(
            account_id = %query.account_id,
            returned = page.books.len(),
            total = page.total_count,
            "Books listed"
        );

        Ok(page)
    }
}

/// GetBook Handler
pub struct GetBookHandler {
    book_repo: Arc<dyn BookRepositoryPort>,
}

impl GetBookHandler {
    pub fn new(book_repo: Arc<dyn BookRepositoryPort>) -> Self {
        Self { book_repo }
    }

    pub async fn handle(&self, query: GetBook) -> Result<Book, ApplicationError> {
        let filter = Filter::new()
            .by_account_id(&query.account_id)
            .by_id(query.book_id);

        self.book_repo
            .find(&filter)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Book", query.book_id))
    }
}

/// GetSharedBook Handler
pub struct GetSharedBookHandler {
    book_repo: Arc<dyn BookRepositoryPort>,
}

impl GetSharedBookHandler {
    pub fn new(book_repo: Arc<dyn BookRepositoryPort>) -> Self {
        Self { book_repo }
    }

    pub async fn handle(&self, query: GetSharedBook) -> Result<SharedBook, ApplicationError> {
        let book = self
            .book_repo
            .find(&Filter::new().by_id(query.book_id))
            .await?
            .ok_or_else(|| ApplicationError::not_found("Book", query.book_id))?;

        Ok(SharedBook::from(book))
    }
}
