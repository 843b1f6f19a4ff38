//! SQLite Book Repository
//!
//! 书籍查询统一走 books LEFT JOIN authors / publishers，
//! 关联记录在行映射时一次性还原为 `Option<Author>` / `Option<Publisher>`。

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{FromRow, QueryBuilder, Sqlite};

use super::catalog;
use super::description_repo::load_descriptions;
use super::{
    db_error, decode_optional_timestamp, decode_timestamp, encode_timestamp, push_predicates,
    with_transaction, DbPool,
};
use crate::application::ports::{
    BookPage, BookQuery, BookRepositoryPort, Filter, NewBook, Pagination, RepositoryError,
};
use crate::domain::{
    AccountId, Book, CountedDate, CountedName, DateDimension, DateGranularity, ReadProgress,
    ReadState, DATE_BUCKET_LIMIT,
};

const BOOK_FROM: &str = r#"
    FROM books
    LEFT JOIN authors ON authors.id = books.author_id
    LEFT JOIN publishers ON publishers.id = books.publisher_id"#;

const BOOK_COLUMNS: &str = r#"
    SELECT books.id, books.account_id, books.title, books.isbn, books.read_state,
           books.start_at, books.end_at,
           books.small_image_url, books.medium_image_url, books.item_url, books.affiliate_url,
           books.created_at, books.updated_at,
           authors.id AS joined_author_id, authors.name AS author_name,
           authors.created_at AS author_created_at, authors.updated_at AS author_updated_at,
           publishers.id AS joined_publisher_id, publishers.name AS publisher_name,
           publishers.created_at AS publisher_created_at,
           publishers.updated_at AS publisher_updated_at"#;

/// SQLite Book Repository
pub struct SqliteBookRepository {
    pool: DbPool,
    /// 日期分桶使用的 UTC 偏移（分钟）
    utc_offset_minutes: i32,
}

impl SqliteBookRepository {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            utc_offset_minutes: 0,
        }
    }

    pub fn with_utc_offset(mut self, minutes: i32) -> Self {
        self.utc_offset_minutes = minutes;
        self
    }

    async fn find_row(&self, filter: &Filter) -> Result<Option<Book>, RepositoryError> {
        let (filter, search) = filter.clone().split_search();

        let mut builder: QueryBuilder<'_, Sqlite> = QueryBuilder::new(BOOK_COLUMNS);
        builder.push(BOOK_FROM);
        push_book_conditions(&mut builder, &filter, search.as_deref());
        builder.push(" ORDER BY books.id ASC LIMIT 1");

        let row: Option<BookRow> = builder
            .build_query_as()
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        row.map(Book::try_from).transpose()
    }

    async fn count_names(
        &self,
        filter: &Filter,
        table: &str,
        column: &str,
    ) -> Result<Vec<CountedName>, RepositoryError> {
        let (filter, _) = filter.clone().split_search();

        let mut builder: QueryBuilder<'_, Sqlite> = QueryBuilder::new(format!(
            "SELECT COALESCE({table}.name, '') AS name, COUNT(books.id) AS count \
             FROM books LEFT JOIN {table} ON {table}.id = books.{column}"
        ));
        push_predicates(&mut builder, "books", &filter);
        builder.push(format!(" GROUP BY {table}.id ORDER BY count DESC"));

        let rows: Vec<CountedNameRow> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(rows
            .into_iter()
            .map(|row| CountedName::new(row.name, row.count))
            .collect())
    }
}

#[derive(FromRow)]
struct BookRow {
    id: i64,
    account_id: String,
    title: String,
    isbn: Option<String>,
    read_state: i64,
    start_at: Option<String>,
    end_at: Option<String>,
    small_image_url: Option<String>,
    medium_image_url: Option<String>,
    item_url: Option<String>,
    affiliate_url: Option<String>,
    created_at: String,
    updated_at: String,
    joined_author_id: Option<i64>,
    author_name: Option<String>,
    author_created_at: Option<String>,
    author_updated_at: Option<String>,
    joined_publisher_id: Option<i64>,
    publisher_name: Option<String>,
    publisher_created_at: Option<String>,
    publisher_updated_at: Option<String>,
}

impl TryFrom<BookRow> for Book {
    type Error = RepositoryError;

    fn try_from(row: BookRow) -> Result<Self, Self::Error> {
        let state = ReadState::from_code(row.read_state)
            .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;
        let progress = ReadProgress::from_parts(
            state,
            decode_optional_timestamp(row.start_at)?,
            decode_optional_timestamp(row.end_at)?,
        )
        .map_err(|e| RepositoryError::SerializationError(format!("book {}: {}", row.id, e)))?;

        let author = catalog::joined(
            row.joined_author_id,
            row.author_name,
            row.author_created_at,
            row.author_updated_at,
        )?;
        let publisher = catalog::joined(
            row.joined_publisher_id,
            row.publisher_name,
            row.publisher_created_at,
            row.publisher_updated_at,
        )?;

        Ok(Book {
            id: row.id,
            account_id: AccountId::new(row.account_id),
            title: row.title,
            isbn: row.isbn,
            author: author.map(Into::into),
            publisher: publisher.map(Into::into),
            progress,
            descriptions: Vec::new(),
            small_image_url: row.small_image_url,
            medium_image_url: row.medium_image_url,
            item_url: row.item_url,
            affiliate_url: row.affiliate_url,
            created_at: decode_timestamp(&row.created_at)?,
            updated_at: decode_timestamp(&row.updated_at)?,
        })
    }
}

#[derive(FromRow)]
struct CountedNameRow {
    name: String,
    count: i64,
}

#[derive(FromRow)]
struct CountedDateRow {
    bucket: String,
    count: i64,
}

/// LIKE 通配符转义（ESCAPE '\'）
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// 等值谓词 + 可选的 书名 / 作者名 / 出版社名 模糊搜索
fn push_book_conditions(
    builder: &mut QueryBuilder<'_, Sqlite>,
    filter: &Filter,
    search: Option<&str>,
) {
    let pushed = push_predicates(builder, "books", filter);

    if let Some(term) = search {
        let pattern = format!("%{}%", escape_like(term));
        builder.push(if pushed == 0 { " WHERE " } else { " AND " });
        builder
            .push("(books.title LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR authors.name LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR publishers.name LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }
}

#[async_trait]
impl BookRepositoryPort for SqliteBookRepository {
    async fn find_all(&self, query: BookQuery) -> Result<BookPage, RepositoryError> {
        let BookQuery {
            filter,
            pagination,
            sort,
        } = query;
        let (filter, search) = filter.split_search();

        // 总数不受分页影响
        let mut count_builder: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new("SELECT COUNT(books.id)");
        count_builder.push(BOOK_FROM);
        push_book_conditions(&mut count_builder, &filter, search.as_deref());
        let total_count: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;

        let (column, ascending) = sort.order();
        let direction = if ascending { " ASC" } else { " DESC" };

        let mut builder: QueryBuilder<'_, Sqlite> = QueryBuilder::new(BOOK_COLUMNS);
        builder.push(BOOK_FROM);
        push_book_conditions(&mut builder, &filter, search.as_deref());
        builder
            .push(" ORDER BY books.")
            .push(column)
            .push(direction)
            .push(", books.id")
            .push(direction);
        if let Some((limit, offset)) = pagination.limit_offset() {
            builder
                .push(" LIMIT ")
                .push_bind(limit)
                .push(" OFFSET ")
                .push_bind(offset);
        }

        let rows: Vec<BookRow> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        let books = rows
            .into_iter()
            .map(Book::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(BookPage { books, total_count })
    }

    async fn find(&self, filter: &Filter) -> Result<Option<Book>, RepositoryError> {
        let Some(mut book) = self.find_row(filter).await? else {
            return Ok(None);
        };
        book.descriptions = load_descriptions(&self.pool, book.id, Pagination::unbounded()).await?;
        Ok(Some(book))
    }

    async fn create(&self, book: &NewBook) -> Result<Book, RepositoryError> {
        let now = encode_timestamp(Utc::now());

        let id = sqlx::query(
            r#"
            INSERT INTO books (
                account_id, title, isbn, author_id, publisher_id, read_state,
                small_image_url, medium_image_url, item_url, affiliate_url,
                created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(book.account_id.as_str())
        .bind(&book.title)
        .bind(&book.isbn)
        .bind(book.author_id)
        .bind(book.publisher_id)
        .bind(ReadState::NotRead.code())
        .bind(&book.small_image_url)
        .bind(&book.medium_image_url)
        .bind(&book.item_url)
        .bind(&book.affiliate_url)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(db_error)?
        .last_insert_rowid();

        self.find(&Filter::new().by_id(id))
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("book {id}")))
    }

    async fn store(&self, book: &Book) -> Result<(), RepositoryError> {
        let updated = sqlx::query(
            r#"
            UPDATE books SET
                title = ?, isbn = ?, author_id = ?, publisher_id = ?,
                read_state = ?, start_at = ?, end_at = ?,
                small_image_url = ?, medium_image_url = ?, item_url = ?, affiliate_url = ?,
                updated_at = ?
            WHERE id = ? AND account_id = ?
            "#,
        )
        .bind(&book.title)
        .bind(&book.isbn)
        .bind(book.author_id())
        .bind(book.publisher_id())
        .bind(book.read_state().code())
        .bind(book.progress.start_at().map(encode_timestamp))
        .bind(book.progress.end_at().map(encode_timestamp))
        .bind(&book.small_image_url)
        .bind(&book.medium_image_url)
        .bind(&book.item_url)
        .bind(&book.affiliate_url)
        .bind(encode_timestamp(Utc::now()))
        .bind(book.id)
        .bind(book.account_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(db_error)?
        .rows_affected();

        if updated == 0 {
            return Err(RepositoryError::NotFound(format!("book {}", book.id)));
        }

        Ok(())
    }

    async fn store_progress(
        &self,
        book: &Book,
        expected: ReadState,
    ) -> Result<bool, RepositoryError> {
        let updated = sqlx::query(
            r#"
            UPDATE books SET read_state = ?, start_at = ?, end_at = ?, updated_at = ?
            WHERE id = ? AND account_id = ? AND read_state = ?
            "#,
        )
        .bind(book.read_state().code())
        .bind(book.progress.start_at().map(encode_timestamp))
        .bind(book.progress.end_at().map(encode_timestamp))
        .bind(encode_timestamp(Utc::now()))
        .bind(book.id)
        .bind(book.account_id.as_str())
        .bind(expected.code())
        .execute(&self.pool)
        .await
        .map_err(db_error)?
        .rows_affected();

        Ok(updated == 1)
    }

    async fn delete(&self, filter: &Filter) -> Result<(), RepositoryError> {
        let book = self
            .find(filter)
            .await?
            .ok_or_else(|| RepositoryError::NotFound("book".to_string()))?;

        let book_id = book.id;
        let description_ids: Vec<i64> = book.descriptions.iter().map(|d| d.id).collect();

        with_transaction(&self.pool, move |conn| {
            Box::pin(async move {
                for id in description_ids {
                    sqlx::query("DELETE FROM descriptions WHERE id = ?")
                        .bind(id)
                        .execute(&mut *conn)
                        .await
                        .map_err(db_error)?;
                }

                let deleted = sqlx::query("DELETE FROM books WHERE id = ?")
                    .bind(book_id)
                    .execute(&mut *conn)
                    .await
                    .map_err(db_error)?
                    .rows_affected();

                if deleted == 0 {
                    return Err(RepositoryError::NotFound(format!("book {book_id}")));
                }

                Ok(())
            })
        })
        .await
    }

    async fn count_by_author(&self, filter: &Filter) -> Result<Vec<CountedName>, RepositoryError> {
        self.count_names(filter, "authors", "author_id").await
    }

    async fn count_by_publisher(
        &self,
        filter: &Filter,
    ) -> Result<Vec<CountedName>, RepositoryError> {
        self.count_names(filter, "publishers", "publisher_id").await
    }

    async fn count_by_date(
        &self,
        filter: &Filter,
        dimension: DateDimension,
        granularity: DateGranularity,
    ) -> Result<Vec<CountedDate>, RepositoryError> {
        let (filter, _) = filter.clone().split_search();
        let column = dimension.column();
        let modifier = format!("{:+} minutes", self.utc_offset_minutes);

        let mut builder: QueryBuilder<'_, Sqlite> = QueryBuilder::new("SELECT strftime(");
        builder
            .push_bind(granularity.format())
            .push(format!(", books.{column}, "))
            .push_bind(modifier)
            .push(") AS bucket, COUNT(books.id) AS count FROM books");

        let pushed = push_predicates(&mut builder, "books", &filter);
        builder
            .push(if pushed == 0 { " WHERE " } else { " AND " })
            .push(format!("books.{column} IS NOT NULL"));
        if dimension == DateDimension::ReadEnd {
            // 未开始就读完的记录不计入
            builder.push(" AND books.start_at IS NOT NULL");
        }
        builder
            .push(" GROUP BY bucket ORDER BY bucket ASC LIMIT ")
            .push_bind(DATE_BUCKET_LIMIT as i64);

        let rows: Vec<CountedDateRow> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(rows
            .into_iter()
            .map(|row| CountedDate {
                date: row.bucket,
                count: row.count,
            })
            .collect())
    }
}
