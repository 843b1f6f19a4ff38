//! Author / Publisher Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{AuthorRepositoryPort, PublisherRepositoryPort};
use crate::application::queries::{ListCountedAuthors, ListCountedPublishers};
use crate::domain::{CountedAuthor, CountedPublisher};

/// ListCountedAuthors Handler
pub struct ListCountedAuthorsHandler {
    author_repo: Arc<dyn AuthorRepositoryPort>,
}

impl ListCountedAuthorsHandler {
    pub fn new(author_repo: Arc<dyn AuthorRepositoryPort>) -> Self {
        Self { author_repo }
    }

    pub async fn handle(
        &self,
        query: ListCountedAuthors,
    ) -> Result<Vec<CountedAuthor>, ApplicationError> {
        Ok(self.author_repo.find_all_counted(&query.account_id).await?)
    }
}

/// ListCountedPublishers Handler
pub struct ListCountedPublishersHandler {
    publisher_repo: Arc<dyn PublisherRepositoryPort>,
}

impl ListCountedPublishersHandler {
    pub fn new(publisher_repo: Arc<dyn PublisherRepositoryPort>) -> Self {
        Self { publisher_repo }
    }

    pub async fn handle(
        &self,
        query: ListCountedPublishers,
    ) -> Result<Vec<CountedPublisher>, ApplicationError> {
        Ok(self
            .publisher_repo
            .find_all_counted(&query.account_id)
            .await?)
    }
}
