//! Statistics - 书籍统计
//!
//! 名称聚合（作者 / 出版社）与按日期分桶计数的领域规则。

use serde::Serialize;
use std::collections::HashMap;

use thiserror::Error;

/// 名称聚合最多返回的条目数
pub const TOP_NAMES_LIMIT: usize = 20;

/// 日期分桶最多返回的条目数（并非真正的分页）
pub const DATE_BUCKET_LIMIT: usize = 500;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatsError {
    #[error("invalid counted name key: {0}")]
    InvalidNameKey(String),

    #[error("invalid date key: {0}")]
    InvalidDateKey(String),

    #[error("invalid date type: {0}")]
    InvalidGranularity(String),
}

/// 名称 + 出现次数
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountedName {
    pub name: String,
    pub count: i64,
}

impl CountedName {
    pub fn new(name: impl Into<String>, count: i64) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

/// 日期桶 + 出现次数
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountedDate {
    pub date: String,
    pub count: i64,
}

/// 名称聚合维度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameDimension {
    Author,
    Publisher,
}

impl NameDimension {
    pub fn parse(key: &str) -> Result<Self, StatsError> {
        match key {
            "author" => Ok(NameDimension::Author),
            "publisher" => Ok(NameDimension::Publisher),
            other => Err(StatsError::InvalidNameKey(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NameDimension::Author => "author",
            NameDimension::Publisher => "publisher",
        }
    }
}

/// 日期维度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateDimension {
    /// 登记时间
    Registered,
    /// 开始阅读时间
    ReadStart,
    /// 读完时间（要求开始时间也存在）
    ReadEnd,
}

impl DateDimension {
    pub fn parse(key: &str) -> Result<Self, StatsError> {
        match key {
            "register" | "created_at" => Ok(DateDimension::Registered),
            "start" | "start_at" => Ok(DateDimension::ReadStart),
            "end" | "end_at" => Ok(DateDimension::ReadEnd),
            other => Err(StatsError::InvalidDateKey(other.to_string())),
        }
    }

    /// 对应的 books 表列名
    pub fn column(&self) -> &'static str {
        match self {
            DateDimension::Registered => "created_at",
            DateDimension::ReadStart => "start_at",
            DateDimension::ReadEnd => "end_at",
        }
    }
}

/// 分桶粒度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateGranularity {
    Daily,
    Monthly,
}

impl DateGranularity {
    pub fn parse(key: &str) -> Result<Self, StatsError> {
        match key {
            "daily" => Ok(DateGranularity::Daily),
            "monthly" => Ok(DateGranularity::Monthly),
            other => Err(StatsError::InvalidGranularity(other.to_string())),
        }
    }

    /// strftime 格式
    pub fn format(&self) -> &'static str {
        match self {
            DateGranularity::Daily => "%Y-%m-%d",
            DateGranularity::Monthly => "%Y-%m",
        }
    }
}

/// 名称归一化
///
/// 含 `/` 时只保留第一个 `/` 之前的部分（主名称，丢弃译名），再去掉所有空白字符。
pub fn normalize_name(raw: &str) -> String {
    let primary = raw.split('/').next().unwrap_or(raw);
    primary.chars().filter(|c| !c.is_whitespace()).collect()
}

/// 名称聚合
///
/// 1. 丢弃原始名称为空的条目
/// 2. 归一化并按名称合并计数（保持首次出现顺序）
/// 3. 按计数降序（稳定排序）
/// 4. 截取前 20 条
pub fn aggregate_names(rows: Vec<CountedName>) -> Vec<CountedName> {
    let mut grouped: Vec<CountedName> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows.into_iter().filter(|r| !r.name.is_empty()) {
        let name = normalize_name(&row.name);
        match index.get(&name) {
            Some(&i) => grouped[i].count += row.count,
            None => {
                index.insert(name.clone(), grouped.len());
                grouped.push(CountedName::new(name, row.count));
            }
        }
    }

    grouped.sort_by(|a, b| b.count.cmp(&a.count));
    grouped.truncate(TOP_NAMES_LIMIT);
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("Doe, J/ドウ"), "Doe,J");
        assert_eq!(normalize_name("Doe, J"), "Doe,J");
        assert_eq!(normalize_name(" 村上 春樹 "), "村上春樹");
        assert_eq!(normalize_name("a/b/c"), "a");
        assert_eq!(normalize_name("\tTab\nNew"), "TabNew");
    }

    #[test]
    fn test_merges_primary_names() {
        let rows = vec![CountedName::new("Doe, J/ドウ", 3), CountedName::new("Doe, J", 2)];
        assert_eq!(aggregate_names(rows), vec![CountedName::new("Doe,J", 5)]);
    }

    #[test]
    fn test_drops_originally_empty_names_only() {
        let rows = vec![
            CountedName::new("", 7),
            CountedName::new("   ", 2),
            CountedName::new("Alice", 1),
        ];
        let result = aggregate_names(rows);
        assert_eq!(
            result,
            vec![CountedName::new("", 2), CountedName::new("Alice", 1)]
        );
    }

    #[test]
    fn test_sorted_descending_and_truncated() {
        let rows: Vec<CountedName> = (0..30)
            .map(|i| CountedName::new(format!("author{}", i), i))
            .collect();
        let result = aggregate_names(rows);

        assert_eq!(result.len(), TOP_NAMES_LIMIT);
        assert_eq!(result[0], CountedName::new("author29", 29));
        assert!(result.windows(2).all(|w| w[0].count >= w[1].count));
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let rows = vec![
            CountedName::new("b", 1),
            CountedName::new("a", 1),
            CountedName::new("c", 2),
        ];
        let names: Vec<String> = aggregate_names(rows).into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate_names(Vec::new()).is_empty());
    }

    #[test]
    fn test_dimension_keys() {
        assert_eq!(NameDimension::parse("author"), Ok(NameDimension::Author));
        assert!(NameDimension::parse("genre").is_err());
        assert_eq!(DateDimension::parse("end_at").unwrap().column(), "end_at");
        assert_eq!(DateDimension::parse("register"), Ok(DateDimension::Registered));
        assert!(DateDimension::parse("updated_at").is_err());
        assert_eq!(DateGranularity::parse("monthly").unwrap().format(), "%Y-%m");
        assert!(DateGranularity::parse("yearly").is_err());
    }
}
