//! SQLite Publisher Repository

use async_trait::async_trait;

use super::catalog::{self, CatalogTable};
use super::DbPool;
use crate::application::ports::{Filter, PublisherRepositoryPort, RepositoryError};
use crate::domain::{AccountId, CountedPublisher, Publisher};

/// SQLite Publisher Repository
pub struct SqlitePublisherRepository {
    pool: DbPool,
}

impl SqlitePublisherRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PublisherRepositoryPort for SqlitePublisherRepository {
    async fn find_all_counted(
        &self,
        account_id: &AccountId,
    ) -> Result<Vec<CountedPublisher>, RepositoryError> {
        let rows = catalog::find_counted(&self.pool, CatalogTable::Publishers, account_id).await?;
        Ok(rows
            .into_iter()
            .map(|(record, count)| CountedPublisher {
                publisher: record.into(),
                count,
            })
            .collect())
    }

    async fn find(&self, filter: &Filter) -> Result<Option<Publisher>, RepositoryError> {
        let record = catalog::find_one(&self.pool, CatalogTable::Publishers, filter).await?;
        Ok(record.map(Publisher::from))
    }

    async fn create(&self, name: &str) -> Result<Publisher, RepositoryError> {
        let record = catalog::insert(&self.pool, CatalogTable::Publishers, name).await?;
        Ok(record.into())
    }
}
