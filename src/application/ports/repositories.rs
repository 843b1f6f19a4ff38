//! Repository Ports - 出站端口
//!
//! 定义数据持久化的抽象接口
//! 具体实现在 infrastructure 层（SQLite）

use async_trait::async_trait;
use thiserror::Error;

use super::{BookQuery, Filter, Pagination};
use crate::domain::{
    AccountId, Author, Book, CountedAuthor, CountedDate, CountedName, CountedPublisher,
    DateDimension, DateGranularity, Description, Publisher, ReadState,
};

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// 事务执行中途 panic，已回滚
    #[error("Transaction aborted: {0}")]
    TransactionAborted(String),
}

// ============================================================================
// Book Repository
// ============================================================================

/// 书籍分页结果，total_count 不受分页影响
#[derive(Debug, Clone)]
pub struct BookPage {
    pub books: Vec<Book>,
    pub total_count: i64,
}

/// 新建书籍（初始为 NotRead）
#[derive(Debug, Clone)]
pub struct NewBook {
    pub account_id: AccountId,
    pub title: String,
    pub isbn: Option<String>,
    pub author_id: Option<i64>,
    pub publisher_id: Option<i64>,
    pub small_image_url: Option<String>,
    pub medium_image_url: Option<String>,
    pub item_url: Option<String>,
    pub affiliate_url: Option<String>,
}

/// Book Repository Port
#[async_trait]
pub trait BookRepositoryPort: Send + Sync {
    /// 分页查询，作者 / 出版社完整填充
    async fn find_all(&self, query: BookQuery) -> Result<BookPage, RepositoryError>;

    /// 查找单本书籍（含笔记）
    async fn find(&self, filter: &Filter) -> Result<Option<Book>, RepositoryError>;

    /// 创建书籍
    async fn create(&self, book: &NewBook) -> Result<Book, RepositoryError>;

    /// 保存书籍（刷新 updated_at）
    async fn store(&self, book: &Book) -> Result<(), RepositoryError>;

    /// 保存阅读进度，仅当存储中的状态仍为 `expected` 时生效
    ///
    /// 返回 false 表示被并发修改
    async fn store_progress(&self, book: &Book, expected: ReadState)
        -> Result<bool, RepositoryError>;

    /// 在一个事务中删除书籍及其全部笔记
    async fn delete(&self, filter: &Filter) -> Result<(), RepositoryError>;

    /// 按作者名分组计数（名称可能为空或重复）
    async fn count_by_author(&self, filter: &Filter) -> Result<Vec<CountedName>, RepositoryError>;

    /// 按出版社名分组计数
    async fn count_by_publisher(
        &self,
        filter: &Filter,
    ) -> Result<Vec<CountedName>, RepositoryError>;

    /// 按日期分桶计数
    async fn count_by_date(
        &self,
        filter: &Filter,
        dimension: DateDimension,
        granularity: DateGranularity,
    ) -> Result<Vec<CountedDate>, RepositoryError>;
}

// ============================================================================
// Description Repository
// ============================================================================

/// Description Repository Port
///
/// 所有操作都经由书籍限定在账户范围内
#[async_trait]
pub trait DescriptionRepositoryPort: Send + Sync {
    /// 获取书籍的笔记
    async fn find_by_book(
        &self,
        account_id: &AccountId,
        book_id: i64,
        pagination: Pagination,
    ) -> Result<Vec<Description>, RepositoryError>;

    /// 在一个事务中创建笔记并刷新书籍 updated_at
    async fn create(
        &self,
        account_id: &AccountId,
        book_id: i64,
        content: &str,
    ) -> Result<Description, RepositoryError>;

    /// 删除笔记
    async fn delete(&self, account_id: &AccountId, description_id: i64)
        -> Result<(), RepositoryError>;
}

// ============================================================================
// Author / Publisher Repository
// ============================================================================

/// Author Repository Port
#[async_trait]
pub trait AuthorRepositoryPort: Send + Sync {
    /// 账户书籍引用到的作者及数量
    async fn find_all_counted(
        &self,
        account_id: &AccountId,
    ) -> Result<Vec<CountedAuthor>, RepositoryError>;

    async fn find(&self, filter: &Filter) -> Result<Option<Author>, RepositoryError>;

    async fn create(&self, name: &str) -> Result<Author, RepositoryError>;
}

/// Publisher Repository Port
#[async_trait]
pub trait PublisherRepositoryPort: Send + Sync {
    async fn find_all_counted(
        &self,
        account_id: &AccountId,
    ) -> Result<Vec<CountedPublisher>, RepositoryError>;

    async fn find(&self, filter: &Filter) -> Result<Option<Publisher>, RepositoryError>;

    async fn create(&self, name: &str) -> Result<Publisher, RepositoryError>;
}
