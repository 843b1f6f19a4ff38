//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（Repository、IdentityVerifier、查询规格）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    // Book commands
    CatalogRef,
    CreateBook,
    DeleteBook,
    ToggleReadState,
    UpdateBook,
    // Description commands
    CreateDescription,
    DeleteDescription,
    // Catalog commands
    CreateAuthor,
    CreatePublisher,
    // Handlers
    handlers::{
        CreateAuthorHandler, CreateBookHandler, CreateDescriptionHandler, CreatePublisherHandler,
        DeleteBookHandler, DeleteDescriptionHandler, ToggleReadStateHandler, UpdateBookHandler,
    },
};

pub use error::ApplicationError;

pub use ports::{
    // Query specification
    BookQuery,
    Filter,
    FilterKey,
    FilterValue,
    Pagination,
    SortColumn,
    SortKey,
    // Repositories
    AuthorRepositoryPort,
    BookPage,
    BookRepositoryPort,
    DescriptionRepositoryPort,
    NewBook,
    PublisherRepositoryPort,
    RepositoryError,
    // Identity
    IdentityError,
    IdentityVerifierPort,
};

pub use queries::{
    // Book queries
    GetBook,
    GetSharedBook,
    ListBooks,
    // Description queries
    ListDescriptions,
    // Catalog queries
    ListCountedAuthors,
    ListCountedPublishers,
    // Statistics queries
    CountBooksByDate,
    CountBooksByName,
    // Handlers
    handlers::{
        CountBooksByDateHandler, CountBooksByNameHandler, GetBookHandler, GetSharedBookHandler,
        ListBooksHandler, ListCountedAuthorsHandler, ListCountedPublishersHandler,
        ListDescriptionsHandler, SharedBook,
    },
};
