//! SQLite Author Repository

use async_trait::async_trait;

use super::catalog::{self, CatalogTable};
use super::DbPool;
use crate::application::ports::{AuthorRepositoryPort, Filter, RepositoryError};
use crate::domain::{AccountId, Author, CountedAuthor};

/// SQLite Author Repository
pub struct SqliteAuthorRepository {
    pool: DbPool,
}

impl SqliteAuthorRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorRepositoryPort for SqliteAuthorRepository {
    async fn find_all_counted(
        &self,
        account_id: &AccountId,
    ) -> Result<Vec<CountedAuthor>, RepositoryError> {
        let rows = catalog::find_counted(&self.pool, CatalogTable::Authors, account_id).await?;
        Ok(rows
            .into_iter()
            .map(|(record, count)| CountedAuthor {
                author: record.into(),
                count,
            })
            .collect())
    }

    async fn find(&self, filter: &Filter) -> Result<Option<Author>, RepositoryError> {
        let record = catalog::find_one(&self.pool, CatalogTable::Authors, filter).await?;
        Ok(record.map(Author::from))
    }

    async fn create(&self, name: &str) -> Result<Author, RepositoryError> {
        let record = catalog::insert(&self.pool, CatalogTable::Authors, name).await?;
        Ok(record.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::sqlite::{create_pool, run_migrations, DatabaseConfig};

    async fn setup() -> SqliteAuthorRepository {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteAuthorRepository::new(pool)
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = setup().await;

        let created = repo.create("Ursula K. Le Guin").await.unwrap();
        assert!(created.id > 0);

        let by_id = repo.find(&Filter::new().by_id(created.id)).await.unwrap();
        assert_eq!(by_id, Some(created.clone()));

        let by_name = repo
            .find(&Filter::new().by_name("Ursula K. Le Guin"))
            .await
            .unwrap();
        assert_eq!(by_name.map(|a| a.id), Some(created.id));

        let missing = repo.find(&Filter::new().by_name("Nobody")).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_name() {
        let repo = setup().await;

        repo.create("Borges").await.unwrap();
        let result = repo.create("Borges").await;

        assert!(matches!(result, Err(RepositoryError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_counted_without_books_is_empty() {
        let repo = setup().await;
        repo.create("Borges").await.unwrap();

        let counted = repo
            .find_all_counted(&AccountId::new("acct"))
            .await
            .unwrap();
        assert!(counted.is_empty());
    }
}
