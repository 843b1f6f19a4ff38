//! Book Context - 书籍限界上下文
//!
//! 职责:
//! - Book 聚合与阅读状态机
//! - 作者 / 出版社 / 笔记实体

mod aggregate;
mod entities;
mod errors;
mod progress;
mod value_objects;

pub use aggregate::Book;
pub use entities::{
    catalog_name, Author, CountedAuthor, CountedPublisher, Description, Publisher,
};
pub use errors::BookError;
pub use progress::ReadProgress;
pub use value_objects::{AccountId, ReadState, Title};
