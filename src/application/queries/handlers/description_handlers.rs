//! Description Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{DescriptionRepositoryPort, RepositoryError};
use crate::application::queries::ListDescriptions;
use crate::domain::Description;

/// ListDescriptions Handler
pub struct ListDescriptionsHandler {
    description_repo: Arc<dyn DescriptionRepositoryPort>,
}

impl ListDescriptionsHandler {
    pub fn new(description_repo: Arc<dyn DescriptionRepositoryPort>) -> Self {
        Self { description_repo }
    }

    pub async fn handle(
        &self,
        query: ListDescriptions,
    ) -> Result<Vec<Description>, ApplicationError> {
        self.description_repo
            .find_by_book(&query.account_id, query.book_id, query.pagination)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound(_) => ApplicationError::not_found("Book", query.book_id),
                other => other.into(),
            })
    }
}
