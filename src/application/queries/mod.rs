//! 应用层 - 查询（读操作）
//!
//! CQRS 查询侧：处理所有读操作

mod book_queries;
mod catalog_queries;
mod description_queries;
mod stats_queries;

pub mod handlers;

pub use book_queries::*;
pub use catalog_queries::*;
pub use description_queries::*;
pub use stats_queries::*;
