//! Book Queries

use crate::application::ports::Pagination;
use crate::domain::AccountId;

/// 列出账户书籍
///
/// status / sort_key 保持原始字符串，由处理器校验
#[derive(Debug, Clone)]
pub struct ListBooks {
    pub account_id: AccountId,
    pub isbn: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
    pub pagination: Pagination,
    pub sort_key: Option<String>,
}

/// 获取单本书籍（含笔记）
#[derive(Debug, Clone)]
pub struct GetBook {
    pub account_id: AccountId,
    pub book_id: i64,
}

/// 公开分享视图，不校验账户
#[derive(Debug, Clone)]
pub struct GetSharedBook {
    pub book_id: i64,
}
