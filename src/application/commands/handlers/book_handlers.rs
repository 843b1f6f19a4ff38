//! Book Command Handlers

use chrono::Utc;
use std::sync::Arc;

use crate::application::commands::{
    CatalogRef, CreateBook, DeleteBook, ToggleReadState, UpdateBook,
};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    AuthorRepositoryPort, BookRepositoryPort, Filter, NewBook, PublisherRepositoryPort,
    RepositoryError,
};
use crate::domain::{AccountId, Book, ReadProgress, Title};

use super::catalog_handlers::{resolve_author, resolve_publisher};

fn owned_book(account_id: &AccountId, book_id: i64) -> Filter {
    Filter::new().by_account_id(account_id).by_id(book_id)
}

// ============================================================================
// CreateBook
// ============================================================================

/// CreateBook Handler
pub struct CreateBookHandler {
    book_repo: Arc<dyn BookRepositoryPort>,
    author_repo: Arc<dyn AuthorRepositoryPort>,
    publisher_repo: Arc<dyn PublisherRepositoryPort>,
}

impl CreateBookHandler {
    pub fn new(
        book_repo: Arc<dyn BookRepositoryPort>,
        author_repo: Arc<dyn AuthorRepositoryPort>,
        publisher_repo: Arc<dyn PublisherRepositoryPort>,
    ) -> Self {
        Self {
            book_repo,
            author_repo,
            publisher_repo,
        }
    }

    pub async fn handle(&self, command: CreateBook) -> Result<Book, ApplicationError> {
        let title = Title::new(command.title)?;

        let author_id = match command.author {
            Some(reference) => Some(resolve_author(self.author_repo.as_ref(), reference).await?.id),
            None => None,
        };
        let publisher_id = match command.publisher {
            Some(reference) => {
                Some(resolve_publisher(self.publisher_repo.as_ref(), reference).await?.id)
            }
            None => None,
        };

        let new_book = NewBook {
            account_id: command.account_id,
            title: title.into_inner(),
            isbn: command.isbn,
            author_id,
            publisher_id,
            small_image_url: command.small_image_url,
            medium_image_url: command.medium_image_url,
            item_url: command.item_url,
            affiliate_url: command.affiliate_url,
        };

        let book = self.book_repo.create(&new_book).await?;

        tracing::info!(
            book_id = book.id,
            account_id = %book.account_id,
            title = %book.title,
            "Book created"
        );

        Ok(book)
    }
}

// ============================================================================
// UpdateBook
// ============================================================================

/// UpdateBook Handler
pub struct UpdateBookHandler {
    book_repo: Arc<dyn BookRepositoryPort>,
    author_repo: Arc<dyn AuthorRepositoryPort>,
    publisher_repo: Arc<dyn PublisherRepositoryPort>,
}

impl UpdateBookHandler {
    pub fn new(
        book_repo: Arc<dyn BookRepositoryPort>,
        author_repo: Arc<dyn AuthorRepositoryPort>,
        publisher_repo: Arc<dyn PublisherRepositoryPort>,
    ) -> Self {
        Self {
            book_repo,
            author_repo,
            publisher_repo,
        }
    }

    pub async fn handle(&self, command: UpdateBook) -> Result<Book, ApplicationError> {
        let filter = owned_book(&command.account_id, command.book_id);

        let title = Title::new(command.title)?;
        let progress = ReadProgress::from_timestamps(command.start_at, command.end_at)?;

        let mut book = self
            .book_repo
            .find(&filter)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Book", command.book_id))?;

        book.title = title.into_inner();
        book.progress = progress;
        book.author = match command.author_id {
            Some(id) => Some(resolve_author(self.author_repo.as_ref(), CatalogRef::Id(id)).await?),
            None => None,
        };
        book.publisher = match command.publisher_id {
            Some(id) => {
                Some(resolve_publisher(self.publisher_repo.as_ref(), CatalogRef::Id(id)).await?)
            }
            None => None,
        };

        self.book_repo.store(&book).await?;

        tracing::info!(
            book_id = book.id,
            account_id = %command.account_id,
            read_state = %book.read_state(),
            "Book updated"
        );

        self.book_repo
            .find(&filter)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Book", command.book_id))
    }
}

// ============================================================================
// DeleteBook
// ============================================================================

/// DeleteBook Handler
pub struct DeleteBookHandler {
    book_repo: Arc<dyn BookRepositoryPort>,
}

impl DeleteBookHandler {
    pub fn new(book_repo: Arc<dyn BookRepositoryPort>) -> Self {
        Self { book_repo }
    }

    pub async fn handle(&self, command: DeleteBook) -> Result<(), ApplicationError> {
        let filter = owned_book(&command.account_id, command.book_id);

        self.book_repo.delete(&filter).await.map_err(|e| match e {
            RepositoryError::NotFound(_) => ApplicationError::not_found("Book", command.book_id),
            other => other.into(),
        })?;

        tracing::info!(
            book_id = command.book_id,
            account_id = %command.account_id,
            "Book deleted with descriptions"
        );

        Ok(())
    }
}

// ============================================================================
// ToggleReadState
// ============================================================================

/// ToggleReadState Handler
///
/// 读取当前状态 → 状态机切换 → 以读取到的状态作为条件写回（乐观并发）
pub struct ToggleReadStateHandler {
    book_repo: Arc<dyn BookRepositoryPort>,
}

impl ToggleReadStateHandler {
    pub fn new(book_repo: Arc<dyn BookRepositoryPort>) -> Self {
        Self { book_repo }
    }

    pub async fn handle(&self, command: ToggleReadState) -> Result<Book, ApplicationError> {
        let filter = owned_book(&command.account_id, command.book_id);

        let mut book = self
            .book_repo
            .find(&filter)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Book", command.book_id))?;

        let previous = book.toggle_read_state(Utc::now());

        let stored = self.book_repo.store_progress(&book, previous).await?;
        if !stored {
            tracing::warn!(
                book_id = command.book_id,
                expected = %previous,
                "Read state changed concurrently"
            );
            return Err(ApplicationError::conflict(format!(
                "book {} read state changed concurrently",
                command.book_id
            )));
        }

        tracing::info!(
            book_id = command.book_id,
            from = %previous,
            to = %book.read_state(),
            "Read state toggled"
        );

        self.book_repo
            .find(&filter)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Book", command.book_id))
    }
}
