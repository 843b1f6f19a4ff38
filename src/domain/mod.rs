//! Domain Layer - 领域层
//!
//! - Book Context: 书籍、阅读状态机、作者 / 出版社 / 笔记
//! - Statistics: 名称聚合与日期分桶规则

pub mod book;
pub mod stats;

pub use book::{
    catalog_name, AccountId, Author, Book, BookError, CountedAuthor, CountedPublisher,
    Description, Publisher, ReadProgress, ReadState, Title,
};
pub use stats::{
    aggregate_names, normalize_name, CountedDate, CountedName, DateDimension, DateGranularity,
    NameDimension, StatsError, DATE_BUCKET_LIMIT, TOP_NAMES_LIMIT,
};
