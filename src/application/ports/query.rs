//! Query Specification - 分页与排序
//!
//! 取代链式查询构造：谓词 + 排序 + 分页组合成一个值对象交给仓储。

use super::Filter;

/// 分页参数，page 或 per_page 为 0 表示不分页
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub per_page: u64,
}

impl Pagination {
    pub fn new(page: u64, per_page: u64) -> Self {
        Self { page, per_page }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    /// 从查询参数解析，缺失或不是非负整数时视为 0
    pub fn from_params(page: Option<&str>, per_page: Option<&str>) -> Self {
        let parse = |v: Option<&str>| v.and_then(|s| s.trim().parse::<u64>().ok()).unwrap_or(0);
        Self::new(parse(page), parse(per_page))
    }

    pub fn is_unbounded(&self) -> bool {
        self.page == 0 || self.per_page == 0
    }

    /// (limit, offset)，不分页时为 None
    pub fn limit_offset(&self) -> Option<(i64, i64)> {
        if self.is_unbounded() {
            return None;
        }
        let limit = i64::try_from(self.per_page).unwrap_or(i64::MAX);
        let offset = self
            .per_page
            .checked_mul(self.page - 1)
            .and_then(|o| i64::try_from(o).ok())
            .unwrap_or(i64::MAX);
        Some((limit, offset))
    }
}

/// 书籍排序键
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// updated_at 降序
    #[default]
    Default,
    /// 书名升序
    Title,
    /// 其余白名单列降序
    Desc(SortColumn),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    CreatedAt,
    UpdatedAt,
    StartAt,
    EndAt,
    ReadState,
    Isbn,
}

impl SortColumn {
    pub fn column(&self) -> &'static str {
        match self {
            SortColumn::CreatedAt => "created_at",
            SortColumn::UpdatedAt => "updated_at",
            SortColumn::StartAt => "start_at",
            SortColumn::EndAt => "end_at",
            SortColumn::ReadState => "read_state",
            SortColumn::Isbn => "isbn",
        }
    }
}

impl SortKey {
    /// 空串为默认排序；未知键返回 None
    pub fn parse(key: &str) -> Option<Self> {
        let column = match key {
            "" => return Some(SortKey::Default),
            "title" => return Some(SortKey::Title),
            "created_at" => SortColumn::CreatedAt,
            "updated_at" => SortColumn::UpdatedAt,
            "start_at" => SortColumn::StartAt,
            "end_at" => SortColumn::EndAt,
            "read_state" => SortColumn::ReadState,
            "isbn" => SortColumn::Isbn,
            _ => return None,
        };
        Some(SortKey::Desc(column))
    }

    /// (列名, 是否升序)
    pub fn order(&self) -> (&'static str, bool) {
        match self {
            SortKey::Default => ("updated_at", false),
            SortKey::Title => ("title", true),
            SortKey::Desc(column) => (column.column(), false),
        }
    }
}

/// 书籍列表查询
#[derive(Debug, Clone, Default)]
pub struct BookQuery {
    pub filter: Filter,
    pub pagination: Pagination,
    pub sort: SortKey,
}
