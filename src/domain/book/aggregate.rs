//! Book Context - Aggregate Root

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AccountId, Author, Description, Publisher, ReadProgress, ReadState};

/// Book 聚合根
///
/// 不变量:
/// - 只属于一个账户
/// - 阅读状态与开始/结束时间一致（由 ReadProgress 保证）
/// - 笔记随书籍删除
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub account_id: AccountId,
    pub title: String,
    pub isbn: Option<String>,
    pub author: Option<Author>,
    pub publisher: Option<Publisher>,
    pub progress: ReadProgress,
    pub descriptions: Vec<Description>,
    pub small_image_url: Option<String>,
    pub medium_image_url: Option<String>,
    pub item_url: Option<String>,
    pub affiliate_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Book {
    pub fn read_state(&self) -> ReadState {
        self.progress.state()
    }

    /// 切换阅读状态，返回切换前的状态
    pub fn toggle_read_state(&mut self, now: DateTime<Utc>) -> ReadState {
        let previous = self.progress.state();
        self.progress = self.progress.toggle(now);
        previous
    }

    pub fn author_id(&self) -> Option<i64> {
        self.author.as_ref().map(|a| a.id)
    }

    pub fn publisher_id(&self) -> Option<i64> {
        self.publisher.as_ref().map(|p| p.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_book() -> Book {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Book {
            id: 1,
            account_id: AccountId::new("acct"),
            title: "Dune".to_string(),
            isbn: None,
            author: None,
            publisher: None,
            progress: ReadProgress::NotRead,
            descriptions: Vec::new(),
            small_image_url: None,
            medium_image_url: None,
            item_url: None,
            affiliate_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_toggle_returns_previous_state() {
        let mut book = sample_book();
        let now = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();

        assert_eq!(book.toggle_read_state(now), ReadState::NotRead);
        assert_eq!(book.read_state(), ReadState::Reading);
        assert_eq!(book.progress.start_at(), Some(now));
    }

    #[test]
    fn test_reference_ids() {
        let mut book = sample_book();
        assert_eq!(book.author_id(), None);

        let now = book.created_at;
        book.author = Some(Author {
            id: 9,
            name: "Frank Herbert".to_string(),
            created_at: now,
            updated_at: now,
        });
        assert_eq!(book.author_id(), Some(9));
    }
}
