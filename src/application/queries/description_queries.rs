//! Description Queries

use crate::application::ports::Pagination;
use crate::domain::AccountId;

/// 列出书籍笔记
#[derive(Debug, Clone)]
pub struct ListDescriptions {
    pub account_id: AccountId,
    pub book_id: i64,
    pub pagination: Pagination,
}
