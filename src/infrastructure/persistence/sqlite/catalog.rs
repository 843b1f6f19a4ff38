//! authors / publishers 共用的表访问
//!
//! 两张表结构相同，只在表名与 books 外键列上不同。

use chrono::{DateTime, Utc};
use sqlx::{FromRow, QueryBuilder, Sqlite};

use super::{db_error, decode_timestamp, encode_timestamp, push_predicates, DbPool};
use crate::application::ports::{Filter, RepositoryError};
use crate::domain::{AccountId, Author, Publisher};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CatalogTable {
    Authors,
    Publishers,
}

impl CatalogTable {
    fn table(&self) -> &'static str {
        match self {
            CatalogTable::Authors => "authors",
            CatalogTable::Publishers => "publishers",
        }
    }

    fn book_column(&self) -> &'static str {
        match self {
            CatalogTable::Authors => "author_id",
            CatalogTable::Publishers => "publisher_id",
        }
    }
}

/// 作者或出版社的行数据
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CatalogRecord {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CatalogRecord> for Author {
    fn from(record: CatalogRecord) -> Self {
        Author {
            id: record.id,
            name: record.name,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

impl From<CatalogRecord> for Publisher {
    fn from(record: CatalogRecord) -> Self {
        Publisher {
            id: record.id,
            name: record.name,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(FromRow)]
struct CatalogRow {
    id: i64,
    name: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<CatalogRow> for CatalogRecord {
    type Error = RepositoryError;

    fn try_from(row: CatalogRow) -> Result<Self, Self::Error> {
        Ok(CatalogRecord {
            id: row.id,
            name: row.name,
            created_at: decode_timestamp(&row.created_at)?,
            updated_at: decode_timestamp(&row.updated_at)?,
        })
    }
}

#[derive(FromRow)]
struct CountedCatalogRow {
    id: i64,
    name: String,
    created_at: String,
    updated_at: String,
    count: i64,
}

/// LEFT JOIN 得到的关联记录：id 为 NULL 或 0 均视为不存在
pub(crate) fn joined(
    id: Option<i64>,
    name: Option<String>,
    created_at: Option<String>,
    updated_at: Option<String>,
) -> Result<Option<CatalogRecord>, RepositoryError> {
    let id = match id {
        Some(id) if id != 0 => id,
        _ => return Ok(None),
    };

    let missing = |column: &str| {
        RepositoryError::SerializationError(format!("joined row {id} has NULL {column}"))
    };

    Ok(Some(CatalogRecord {
        id,
        name: name.ok_or_else(|| missing("name"))?,
        created_at: decode_timestamp(&created_at.ok_or_else(|| missing("created_at"))?)?,
        updated_at: decode_timestamp(&updated_at.ok_or_else(|| missing("updated_at"))?)?,
    }))
}

/// 被账户书籍引用的条目及引用数量
pub(crate) async fn find_counted(
    pool: &DbPool,
    catalog: CatalogTable,
    account_id: &AccountId,
) -> Result<Vec<(CatalogRecord, i64)>, RepositoryError> {
    let table = catalog.table();
    let sql = format!(
        r#"
        SELECT {table}.id, {table}.name, {table}.created_at, {table}.updated_at,
               COUNT(books.id) AS count
        FROM {table}
        INNER JOIN books ON books.{column} = {table}.id
        WHERE books.account_id = ?
        GROUP BY {table}.id
        ORDER BY count DESC, {table}.name ASC
        "#,
        column = catalog.book_column(),
    );

    let rows: Vec<CountedCatalogRow> = sqlx::query_as(&sql)
        .bind(account_id.as_str())
        .fetch_all(pool)
        .await
        .map_err(db_error)?;

    rows.into_iter()
        .map(|row| {
            let count = row.count;
            let record = CatalogRecord::try_from(CatalogRow {
                id: row.id,
                name: row.name,
                created_at: row.created_at,
                updated_at: row.updated_at,
            })?;
            Ok((record, count))
        })
        .collect()
}

pub(crate) async fn find_one(
    pool: &DbPool,
    catalog: CatalogTable,
    filter: &Filter,
) -> Result<Option<CatalogRecord>, RepositoryError> {
    let table = catalog.table();
    let mut builder: QueryBuilder<'_, Sqlite> = QueryBuilder::new(format!(
        "SELECT {table}.id, {table}.name, {table}.created_at, {table}.updated_at FROM {table}"
    ));
    push_predicates(&mut builder, table, filter);
    builder.push(" ORDER BY ").push(table).push(".id ASC LIMIT 1");

    let row: Option<CatalogRow> = builder
        .build_query_as()
        .fetch_optional(pool)
        .await
        .map_err(db_error)?;

    row.map(CatalogRecord::try_from).transpose()
}

pub(crate) async fn insert(
    pool: &DbPool,
    catalog: CatalogTable,
    name: &str,
) -> Result<CatalogRecord, RepositoryError> {
    let now = Utc::now();
    let encoded = encode_timestamp(now);
    let sql = format!(
        "INSERT INTO {} (name, created_at, updated_at) VALUES (?, ?, ?)",
        catalog.table()
    );

    let result = sqlx::query(&sql)
        .bind(name)
        .bind(&encoded)
        .bind(&encoded)
        .execute(pool)
        .await
        .map_err(db_error)?;

    Ok(CatalogRecord {
        id: result.last_insert_rowid(),
        name: name.to_string(),
        created_at: decode_timestamp(&encoded)?,
        updated_at: decode_timestamp(&encoded)?,
    })
}
