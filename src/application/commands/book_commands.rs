//! Book Commands

use chrono::{DateTime, Utc};

use crate::domain::AccountId;

/// 作者 / 出版社引用：按 ID 或按名称（不存在则创建）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogRef {
    Id(i64),
    Name(String),
}

/// 创建书籍命令
#[derive(Debug, Clone)]
pub struct CreateBook {
    pub account_id: AccountId,
    pub title: String,
    pub isbn: Option<String>,
    pub author: Option<CatalogRef>,
    pub publisher: Option<CatalogRef>,
    pub small_image_url: Option<String>,
    pub medium_image_url: Option<String>,
    pub item_url: Option<String>,
    pub affiliate_url: Option<String>,
}

/// 更新书籍命令，阅读状态由时间戳推导
#[derive(Debug, Clone)]
pub struct UpdateBook {
    pub account_id: AccountId,
    pub book_id: i64,
    pub title: String,
    pub author_id: Option<i64>,
    pub publisher_id: Option<i64>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
}

/// 删除书籍命令
#[derive(Debug, Clone)]
pub struct DeleteBook {
    pub account_id: AccountId,
    pub book_id: i64,
}

/// 切换阅读状态命令
#[derive(Debug, Clone)]
pub struct ToggleReadState {
    pub account_id: AccountId,
    pub book_id: i64,
}
