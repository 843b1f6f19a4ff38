//! Statistics Queries

use crate::domain::AccountId;

/// 按作者或出版社名称计数，key 为 "author" | "publisher"
#[derive(Debug, Clone)]
pub struct CountBooksByName {
    pub account_id: AccountId,
    pub key: String,
}

/// 按日期分桶计数
#[derive(Debug, Clone)]
pub struct CountBooksByDate {
    pub account_id: AccountId,
    pub dimension: String,
    pub granularity: String,
}
