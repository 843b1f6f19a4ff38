//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;

use crate::application::{
    // Command handlers
    CreateAuthorHandler, CreateBookHandler, CreateDescriptionHandler, CreatePublisherHandler,
    DeleteBookHandler, DeleteDescriptionHandler, ToggleReadStateHandler, UpdateBookHandler,
    // Query handlers
    CountBooksByDateHandler, CountBooksByNameHandler, GetBookHandler, GetSharedBookHandler,
    ListBooksHandler, ListCountedAuthorsHandler, ListCountedPublishersHandler,
    ListDescriptionsHandler,
    // Ports
    AuthorRepositoryPort, BookRepositoryPort, DescriptionRepositoryPort, IdentityVerifierPort,
    PublisherRepositoryPort,
};

/// 应用状态
pub struct AppState {
    // ========== Ports ==========
    pub identity_verifier: Arc<dyn IdentityVerifierPort>,

    // ========== Command Handlers ==========
    pub create_book_handler: CreateBookHandler,
    pub update_book_handler: UpdateBookHandler,
    pub delete_book_handler: DeleteBookHandler,
    pub toggle_read_state_handler: ToggleReadStateHandler,
    pub create_description_handler: CreateDescriptionHandler,
    pub delete_description_handler: DeleteDescriptionHandler,
    pub create_author_handler: CreateAuthorHandler,
    pub create_publisher_handler: CreatePublisherHandler,

    // ========== Query Handlers ==========
    pub list_books_handler: ListBooksHandler,
    pub get_book_handler: GetBookHandler,
    pub get_shared_book_handler: GetSharedBookHandler,
    pub list_descriptions_handler: ListDescriptionsHandler,
    pub list_counted_authors_handler: ListCountedAuthorsHandler,
    pub list_counted_publishers_handler: ListCountedPublishersHandler,
    pub count_by_name_handler: CountBooksByNameHandler,
    pub count_by_date_handler: CountBooksByDateHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        book_repo: Arc<dyn BookRepositoryPort>,
        description_repo: Arc<dyn DescriptionRepositoryPort>,
        author_repo: Arc<dyn AuthorRepositoryPort>,
        publisher_repo: Arc<dyn PublisherRepositoryPort>,
        identity_verifier: Arc<dyn IdentityVerifierPort>,
    ) -> Self {
        Self {
            // Ports
            identity_verifier,

            // Command handlers
            create_book_handler: CreateBookHandler::new(
                book_repo.clone(),
                author_repo.clone(),
                publisher_repo.clone(),
            ),
            update_book_handler: UpdateBookHandler::new(
                book_repo.clone(),
                author_repo.clone(),
                publisher_repo.clone(),
            ),
            delete_book_handler: DeleteBookHandler::new(book_repo.clone()),
            toggle_read_state_handler: ToggleReadStateHandler::new(book_repo.clone()),
            create_description_handler: CreateDescriptionHandler::new(description_repo.clone()),
            delete_description_handler: DeleteDescriptionHandler::new(description_repo.clone()),
            create_author_handler: CreateAuthorHandler::new(author_repo.clone()),
            create_publisher_handler: CreatePublisherHandler::new(publisher_repo.clone()),

            // Query handlers
            list_books_handler: ListBooksHandler::new(book_repo.clone()),
            get_book_handler: GetBookHandler::new(book_repo.clone()),
            get_shared_book_handler: GetSharedBookHandler::new(book_repo.clone()),
            list_descriptions_handler: ListDescriptionsHandler::new(description_repo),
            list_counted_authors_handler: ListCountedAuthorsHandler::new(author_repo),
            list_counted_publishers_handler: ListCountedPublishersHandler::new(publisher_repo),
            count_by_name_handler: CountBooksByNameHandler::new(book_repo.clone()),
            count_by_date_handler: CountBooksByDateHandler::new(book_repo),
        }
    }
}
