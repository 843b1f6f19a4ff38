//! Statistics Query Handlers
//!
//! 维度与粒度键在访问仓储之前校验

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{BookRepositoryPort, Filter};
use crate::application::queries::{CountBooksByDate, CountBooksByName};
use crate::domain::{
    aggregate_names, CountedDate, CountedName, DateDimension, DateGranularity, NameDimension,
};

/// CountBooksByName Handler
pub struct CountBooksByNameHandler {
    book_repo: Arc<dyn BookRepositoryPort>,
}

impl CountBooksByNameHandler {
    pub fn new(book_repo: Arc<dyn BookRepositoryPort>) -> Self {
        Self { book_repo }
    }

    pub async fn handle(
        &self,
        query: CountBooksByName,
    ) -> Result<Vec<CountedName>, ApplicationError> {
        let dimension = NameDimension::parse(&query.key)?;
        let filter = Filter::new().by_account_id(&query.account_id);

        let rows = match dimension {
            NameDimension::Author => self.book_repo.count_by_author(&filter).await?,
            NameDimension::Publisher => self.book_repo.count_by_publisher(&filter).await?,
        };

        let counted = aggregate_names(rows);

        tracing::debug!(
            account_id = %query.account_id,
            dimension = dimension.as_str(),
            entries = counted.len(),
            "Counted books by name"
        );

        Ok(counted)
    }
}

/// CountBooksByDate Handler
pub struct CountBooksByDateHandler {
    book_repo: Arc<dyn BookRepositoryPort>,
}

impl CountBooksByDateHandler {
    pub fn new(book_repo: Arc<dyn BookRepositoryPort>) -> Self {
        Self { book_repo }
    }

    pub async fn handle(
        &self,
        query: CountBooksByDate,
    ) -> Result<Vec<CountedDate>, ApplicationError> {
        let dimension = DateDimension::parse(&query.dimension)?;
        let granularity = DateGranularity::parse(&query.granularity)?;
        let filter = Filter::new().by_account_id(&query.account_id);

        Ok(self
            .book_repo
            .count_by_date(&filter, dimension, granularity)
            .await?)
    }
}
