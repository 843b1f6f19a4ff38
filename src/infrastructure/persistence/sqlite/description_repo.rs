//! SQLite Description Repository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{FromRow, QueryBuilder, Sqlite};

use super::{db_error, decode_timestamp, encode_timestamp, with_transaction, DbPool};
use crate::application::ports::{DescriptionRepositoryPort, Pagination, RepositoryError};
use crate::domain::{AccountId, Description};

/// SQLite Description Repository
pub struct SqliteDescriptionRepository {
    pool: DbPool,
}

impl SqliteDescriptionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct DescriptionRow {
    id: i64,
    book_id: i64,
    content: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<DescriptionRow> for Description {
    type Error = RepositoryError;

    fn try_from(row: DescriptionRow) -> Result<Self, Self::Error> {
        Ok(Description {
            id: row.id,
            book_id: row.book_id,
            content: row.content,
            created_at: decode_timestamp(&row.created_at)?,
            updated_at: decode_timestamp(&row.updated_at)?,
        })
    }
}

/// 按插入顺序加载书籍笔记
pub(crate) async fn load_descriptions(
    pool: &DbPool,
    book_id: i64,
    pagination: Pagination,
) -> Result<Vec<Description>, RepositoryError> {
    let mut builder: QueryBuilder<'_, Sqlite> = QueryBuilder::new(
        "SELECT id, book_id, content, created_at, updated_at FROM descriptions WHERE book_id = ",
    );
    builder.push_bind(book_id).push(" ORDER BY id ASC");
    if let Some((limit, offset)) = pagination.limit_offset() {
        builder
            .push(" LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);
    }

    let rows: Vec<DescriptionRow> = builder
        .build_query_as()
        .fetch_all(pool)
        .await
        .map_err(db_error)?;

    rows.into_iter().map(Description::try_from).collect()
}

#[async_trait]
impl DescriptionRepositoryPort for SqliteDescriptionRepository {
    async fn find_by_book(
        &self,
        account_id: &AccountId,
        book_id: i64,
        pagination: Pagination,
    ) -> Result<Vec<Description>, RepositoryError> {
        let owned: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE id = ? AND account_id = ?")
                .bind(book_id)
                .bind(account_id.as_str())
                .fetch_one(&self.pool)
                .await
                .map_err(db_error)?;

        if owned == 0 {
            return Err(RepositoryError::NotFound(format!("book {book_id}")));
        }

        load_descriptions(&self.pool, book_id, pagination).await
    }

    async fn create(
        &self,
        account_id: &AccountId,
        book_id: i64,
        content: &str,
    ) -> Result<Description, RepositoryError> {
        let account_id = account_id.as_str().to_string();
        let content = content.to_string();

        with_transaction(&self.pool, move |conn| {
            Box::pin(async move {
                let now = Utc::now();
                let encoded = encode_timestamp(now);

                // 先刷新书籍 updated_at，同时校验书籍归属
                let touched = sqlx::query(
                    "UPDATE books SET updated_at = ? WHERE id = ? AND account_id = ?",
                )
                .bind(&encoded)
                .bind(book_id)
                .bind(&account_id)
                .execute(&mut *conn)
                .await
                .map_err(db_error)?
                .rows_affected();

                if touched == 0 {
                    return Err(RepositoryError::NotFound(format!("book {book_id}")));
                }

                let id = sqlx::query(
                    "INSERT INTO descriptions (book_id, content, created_at, updated_at) VALUES (?, ?, ?, ?)",
                )
                .bind(book_id)
                .bind(&content)
                .bind(&encoded)
                .bind(&encoded)
                .execute(&mut *conn)
                .await
                .map_err(db_error)?
                .last_insert_rowid();

                let created_at = decode_timestamp(&encoded)?;
                Ok(Description {
                    id,
                    book_id,
                    content,
                    created_at,
                    updated_at: created_at,
                })
            })
        })
        .await
    }

    async fn delete(
        &self,
        account_id: &AccountId,
        description_id: i64,
    ) -> Result<(), RepositoryError> {
        let deleted = sqlx::query(
            "DELETE FROM descriptions WHERE id = ? AND book_id IN (SELECT id FROM books WHERE account_id = ?)",
        )
        .bind(description_id)
        .bind(account_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(db_error)?
        .rows_affected();

        if deleted == 0 {
            return Err(RepositoryError::NotFound(format!(
                "description {description_id}"
            )));
        }

        Ok(())
    }
}
