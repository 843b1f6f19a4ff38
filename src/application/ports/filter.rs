//! Filter - 谓词集合构造
//!
//! 键值等值谓词，由持久化适配器翻译为 WHERE 子句。
//! 全文搜索词是特殊键，适配器需先用 `split_search` 取出。

use std::collections::BTreeMap;

use crate::domain::{AccountId, ReadState};

/// 谓词键（对应列名）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterKey {
    Id,
    AccountId,
    BookId,
    ReadState,
    Isbn,
    Name,
    /// 书名 / 作者名 / 出版社名 模糊搜索
    Search,
}

impl FilterKey {
    pub fn column(&self) -> &'static str {
        match self {
            FilterKey::Id => "id",
            FilterKey::AccountId => "account_id",
            FilterKey::BookId => "book_id",
            FilterKey::ReadState => "read_state",
            FilterKey::Isbn => "isbn",
            FilterKey::Name => "name",
            FilterKey::Search => "book",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Int(i64),
    Text(String),
}

/// 谓词集合
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    predicates: BTreeMap<FilterKey, FilterValue>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by_id(self, id: i64) -> Self {
        self.with(FilterKey::Id, FilterValue::Int(id))
    }

    pub fn by_account_id(self, account_id: &AccountId) -> Self {
        self.with(
            FilterKey::AccountId,
            FilterValue::Text(account_id.as_str().to_string()),
        )
    }

    pub fn by_book_id(self, book_id: i64) -> Self {
        self.with(FilterKey::BookId, FilterValue::Int(book_id))
    }

    pub fn by_status(self, state: ReadState) -> Self {
        self.with(FilterKey::ReadState, FilterValue::Int(state.code()))
    }

    pub fn by_isbn(self, isbn: impl Into<String>) -> Self {
        self.with(FilterKey::Isbn, FilterValue::Text(isbn.into()))
    }

    pub fn by_name(self, name: impl Into<String>) -> Self {
        self.with(FilterKey::Name, FilterValue::Text(name.into()))
    }

    pub fn by_search(self, term: impl Into<String>) -> Self {
        self.with(FilterKey::Search, FilterValue::Text(term.into()))
    }

    fn with(mut self, key: FilterKey, value: FilterValue) -> Self {
        self.predicates.insert(key, value);
        self
    }

    pub fn get(&self, key: FilterKey) -> Option<&FilterValue> {
        self.predicates.get(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// 取出搜索词，剩余部分均为等值谓词
    pub fn split_search(mut self) -> (Self, Option<String>) {
        let term = match self.predicates.remove(&FilterKey::Search) {
            Some(FilterValue::Text(term)) => Some(term),
            Some(FilterValue::Int(n)) => Some(n.to_string()),
            None => None,
        };
        (self, term)
    }

    /// 等值谓词（不含搜索词），按键顺序
    pub fn predicates(&self) -> impl Iterator<Item = (FilterKey, &FilterValue)> {
        self.predicates
            .iter()
            .filter(|(key, _)| **key != FilterKey::Search)
            .map(|(key, value)| (*key, value))
    }
}
