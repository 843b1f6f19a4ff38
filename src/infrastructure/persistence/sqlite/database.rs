//! SQLite Database - 数据库连接、迁移与事务边界

use chrono::{DateTime, SecondsFormat, Utc};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use sqlx::{sqlite::SqlitePoolOptions, Pool, QueryBuilder, Sqlite, SqliteConnection};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::Path;

use crate::application::ports::{Filter, FilterValue, RepositoryError};

/// 数据库配置
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// 数据库文件路径
    pub database_url: String,
    /// 最大连接数
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:./data/bookshelf.db?mode=rwc".to_string(),
            max_connections: 5,
        }
    }
}

impl DatabaseConfig {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            database_url: format!("sqlite:{}?mode=rwc", path.as_ref().display()),
            max_connections: 5,
        }
    }

    /// 内存数据库只能使用单连接，否则每个连接各有一份数据
    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
        }
    }
}

/// 数据库连接池
pub type DbPool = Pool<Sqlite>;

/// 创建数据库连接池
pub async fn create_pool(config: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;

    // 启用 WAL 模式，允许并发读写
    sqlx::query("PRAGMA journal_mode=WAL")
        .execute(&pool)
        .await?;

    // 遇到锁时等待而不是立即失败
    sqlx::query("PRAGMA busy_timeout=5000")
        .execute(&pool)
        .await?;

    sqlx::query("PRAGMA foreign_keys=ON").execute(&pool).await?;

    tracing::info!(
        max_connections = config.max_connections,
        "SQLite pool created with WAL mode and busy_timeout=5000ms"
    );

    Ok(pool)
}

/// 运行数据库迁移（幂等）
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS authors (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS publishers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // read_state: 1 = not_read, 2 = reading, 3 = read
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS books (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            account_id TEXT NOT NULL,
            title TEXT NOT NULL,
            isbn TEXT,
            author_id INTEGER REFERENCES authors(id) ON DELETE SET NULL,
            publisher_id INTEGER REFERENCES publishers(id) ON DELETE SET NULL,
            read_state INTEGER NOT NULL DEFAULT 1,
            start_at TEXT,
            end_at TEXT,
            small_image_url TEXT,
            medium_image_url TEXT,
            item_url TEXT,
            affiliate_url TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS descriptions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            book_id INTEGER NOT NULL,
            content TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (book_id) REFERENCES books(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_books_account_id ON books(account_id)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_books_account_isbn ON books(account_id, isbn)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_descriptions_book_id ON descriptions(book_id)")
        .execute(pool)
        .await?;

    tracing::info!("Database migrations completed");
    Ok(())
}

// ============================================================================
// Transaction boundary
// ============================================================================

/// 在单个事务中执行 `f`
///
/// - `Ok` ⇒ 提交
/// - `Err` ⇒ 回滚并返回原错误
/// - panic ⇒ 回滚并返回 `TransactionAborted`
pub async fn with_transaction<T, F>(pool: &DbPool, f: F) -> Result<T, RepositoryError>
where
    T: Send,
    F: for<'c> FnOnce(&'c mut SqliteConnection) -> BoxFuture<'c, Result<T, RepositoryError>>
        + Send,
{
    let mut tx = pool.begin().await.map_err(db_error)?;

    let outcome = {
        let conn: &mut SqliteConnection = &mut tx;
        AssertUnwindSafe(async move { f(conn).await })
            .catch_unwind()
            .await
    };

    match outcome {
        Ok(Ok(value)) => {
            tx.commit().await.map_err(db_error)?;
            Ok(value)
        }
        Ok(Err(err)) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::error!(error = %rollback_err, "Transaction rollback failed");
            }
            Err(err)
        }
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            tracing::error!(panic = %message, "Transaction aborted by panic, rolling back");
            if let Err(rollback_err) = tx.rollback().await {
                tracing::error!(error = %rollback_err, "Transaction rollback failed");
            }
            Err(RepositoryError::TransactionAborted(message))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

// ============================================================================
// Shared helpers
// ============================================================================

pub(crate) fn db_error(e: sqlx::Error) -> RepositoryError {
    match e {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => {
            RepositoryError::Duplicate(db.message().to_string())
        }
        other => RepositoryError::DatabaseError(other.to_string()),
    }
}

/// 定宽 RFC3339（微秒 + Z），字典序即时间序
pub(crate) fn encode_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn decode_timestamp(raw: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::SerializationError(format!("{raw}: {e}")))
}

pub(crate) fn decode_optional_timestamp(
    raw: Option<String>,
) -> Result<Option<DateTime<Utc>>, RepositoryError> {
    raw.as_deref().map(decode_timestamp).transpose()
}

/// 把等值谓词追加为 ` WHERE t.col = ? AND ...`，返回追加的条件数
///
/// 搜索词不在此处理，调用方需先 `split_search`
pub(crate) fn push_predicates(
    builder: &mut QueryBuilder<'_, Sqlite>,
    table: &str,
    filter: &Filter,
) -> usize {
    let mut pushed = 0;
    for (key, value) in filter.predicates() {
        builder.push(if pushed == 0 { " WHERE " } else { " AND " });
        builder.push(table).push(".").push(key.column()).push(" = ");
        match value {
            FilterValue::Int(v) => {
                builder.push_bind(*v);
            }
            FilterValue::Text(v) => {
                builder.push_bind(v.clone());
            }
        }
        pushed += 1;
    }
    pushed
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup() -> DbPool {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    async fn author_count(pool: &DbPool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    fn insert_author<'a>(
        conn: &'a mut SqliteConnection,
        name: &'static str,
    ) -> BoxFuture<'a, Result<(), RepositoryError>> {
        Box::pin(async move {
            let now = encode_timestamp(Utc::now());
            sqlx::query("INSERT INTO authors (name, created_at, updated_at) VALUES (?, ?, ?)")
                .bind(name)
                .bind(&now)
                .bind(&now)
                .execute(&mut *conn)
                .await
                .map_err(db_error)?;
            Ok(())
        })
    }

    #[tokio::test]
    async fn test_create_in_memory_db() {
        let pool = setup().await;
        // 迁移可重复执行
        run_migrations(&pool).await.unwrap();
    }

    #[tokio::test]
    async fn test_transaction_commits_on_ok() {
        let pool = setup().await;

        with_transaction(&pool, |conn| insert_author(conn, "Alice"))
            .await
            .unwrap();

        assert_eq!(author_count(&pool).await, 1);
    }

    #[tokio::test]
    async fn test_transaction_rolls_back_on_error() {
        let pool = setup().await;

        let result: Result<(), _> = with_transaction(&pool, |conn| {
            Box::pin(async move {
                insert_author(&mut *conn, "Alice").await?;
                Err(RepositoryError::DatabaseError("boom".to_string()))
            })
        })
        .await;

        assert!(matches!(result, Err(RepositoryError::DatabaseError(_))));
        assert_eq!(author_count(&pool).await, 0);
    }

    #[tokio::test]
    async fn test_transaction_rolls_back_on_panic() {
        let pool = setup().await;

        let result: Result<(), _> = with_transaction(&pool, |conn| {
            Box::pin(async move {
                insert_author(&mut *conn, "Alice").await?;
                panic!("invariant broken mid-transaction");
            })
        })
        .await;

        match result {
            Err(RepositoryError::TransactionAborted(msg)) => {
                assert!(msg.contains("invariant broken"))
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(author_count(&pool).await, 0);

        // 连接在回滚后仍可用
        with_transaction(&pool, |conn| insert_author(conn, "Bob"))
            .await
            .unwrap();
        assert_eq!(author_count(&pool).await, 1);
    }

    #[tokio::test]
    async fn test_unique_violation_maps_to_duplicate() {
        let pool = setup().await;

        with_transaction(&pool, |conn| insert_author(conn, "Alice"))
            .await
            .unwrap();
        let result = with_transaction(&pool, |conn| insert_author(conn, "Alice")).await;

        assert!(matches!(result, Err(RepositoryError::Duplicate(_))));
    }

    #[test]
    fn test_timestamp_encoding_is_fixed_width() {
        let a = DateTime::parse_from_rfc3339("2024-01-02T03:04:05Z")
            .unwrap()
            .with_timezone(&Utc);
        let encoded = encode_timestamp(a);
        assert_eq!(encoded, "2024-01-02T03:04:05.000000Z");
        assert_eq!(decode_timestamp(&encoded).unwrap(), a);
        assert!(decode_timestamp("yesterday").is_err());
    }
}
