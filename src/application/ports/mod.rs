//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod filter;
mod identity;
mod query;
mod repositories;

pub use filter::{Filter, FilterKey, FilterValue};
pub use identity::{IdentityError, IdentityVerifierPort};
pub use query::{BookQuery, Pagination, SortColumn, SortKey};
pub use repositories::{
    AuthorRepositoryPort, BookPage, BookRepositoryPort, DescriptionRepositoryPort, NewBook,
    PublisherRepositoryPort, RepositoryError,
};
