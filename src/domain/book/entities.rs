//! Book Context - Entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::BookError;

/// 作者（按 ID 被书籍弱引用）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 出版社（按 ID 被书籍弱引用）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publisher {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 书籍笔记，随书籍一并删除
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    pub id: i64,
    pub book_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 作者 / 出版社附带书籍数量
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountedAuthor {
    pub author: Author,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountedPublisher {
    pub publisher: Publisher,
    pub count: i64,
}

/// 作者 / 出版社名称，去除首尾空白后不得为空
pub fn catalog_name(name: &str) -> Result<String, BookError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(BookError::InvalidName("name cannot be empty".to_string()));
    }
    Ok(name.to_string())
}
