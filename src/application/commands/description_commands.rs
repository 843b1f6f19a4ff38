//! Description Commands

use crate::domain::AccountId;

/// 创建笔记命令
#[derive(Debug, Clone)]
pub struct CreateDescription {
    pub account_id: AccountId,
    pub book_id: i64,
    pub content: String,
}

/// 删除笔记命令
#[derive(Debug, Clone)]
pub struct DeleteDescription {
    pub account_id: AccountId,
    pub description_id: i64,
}
