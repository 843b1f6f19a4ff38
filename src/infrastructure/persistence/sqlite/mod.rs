//! SQLite Persistence - SQLite 数据库持久化实现

mod author_repo;
mod book_repo;
mod catalog;
mod database;
mod description_repo;
mod publisher_repo;

pub use author_repo::*;
pub use book_repo::*;
pub use database::*;
pub use description_repo::*;
pub use publisher_repo::*;
