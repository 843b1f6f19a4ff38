//! Description Command Handlers

use std::sync::Arc;

use crate::application::commands::{CreateDescription, DeleteDescription};
use crate::application::error::ApplicationError;
use crate::application::ports::{DescriptionRepositoryPort, RepositoryError};
use crate::domain::Description;

/// CreateDescription Handler
pub struct CreateDescriptionHandler {
    description_repo: Arc<dyn DescriptionRepositoryPort>,
}

impl CreateDescriptionHandler {
    pub fn new(description_repo: Arc<dyn DescriptionRepositoryPort>) -> Self {
        Self { description_repo }
    }

    pub async fn handle(&self, command: CreateDescription) -> Result<Description, ApplicationError> {
        if command.content.trim().is_empty() {
            return Err(ApplicationError::validation("content cannot be empty"));
        }

        let description = self
            .description_repo
            .create(&command.account_id, command.book_id, &command.content)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound(_) => ApplicationError::not_found("Book", command.book_id),
                other => other.into(),
            })?;

        tracing::info!(
            description_id = description.id,
            book_id = command.book_id,
            account_id = %command.account_id,
            "Description created"
        );

        Ok(description)
    }
}

/// DeleteDescription Handler
pub struct DeleteDescriptionHandler {
    description_repo: Arc<dyn DescriptionRepositoryPort>,
}

impl DeleteDescriptionHandler {
    pub fn new(description_repo: Arc<dyn DescriptionRepositoryPort>) -> Self {
        Self { description_repo }
    }

    pub async fn handle(&self, command: DeleteDescription) -> Result<(), ApplicationError> {
        self.description_repo
            .delete(&command.account_id, command.description_id)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound(_) => {
                    ApplicationError::not_found("Description", command.description_id)
                }
                other => other.into(),
            })?;

        tracing::info!(
            description_id = command.description_id,
            account_id = %command.account_id,
            "Description deleted"
        );

        Ok(())
    }
}
