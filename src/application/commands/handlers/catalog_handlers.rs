//! Author / Publisher Command Handlers

use std::sync::Arc;

use crate::application::commands::{CatalogRef, CreateAuthor, CreatePublisher};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    AuthorRepositoryPort, Filter, PublisherRepositoryPort, RepositoryError,
};
use crate::domain::{catalog_name, Author, Publisher};

// ============================================================================
// CreateAuthor / CreatePublisher
// ============================================================================

/// CreateAuthor Handler
pub struct CreateAuthorHandler {
    author_repo: Arc<dyn AuthorRepositoryPort>,
}

impl CreateAuthorHandler {
    pub fn new(author_repo: Arc<dyn AuthorRepositoryPort>) -> Self {
        Self { author_repo }
    }

    pub async fn handle(&self, command: CreateAuthor) -> Result<Author, ApplicationError> {
        let name = catalog_name(&command.name)?;
        let author = self.author_repo.create(&name).await?;

        tracing::info!(author_id = author.id, name = %author.name, "Author created");

        Ok(author)
    }
}

/// CreatePublisher Handler
pub struct CreatePublisherHandler {
    publisher_repo: Arc<dyn PublisherRepositoryPort>,
}

impl CreatePublisherHandler {
    pub fn new(publisher_repo: Arc<dyn PublisherRepositoryPort>) -> Self {
        Self { publisher_repo }
    }

    pub async fn handle(&self, command: CreatePublisher) -> Result<Publisher, ApplicationError> {
        let name = catalog_name(&command.name)?;
        let publisher = self.publisher_repo.create(&name).await?;

        tracing::info!(publisher_id = publisher.id, name = %publisher.name, "Publisher created");

        Ok(publisher)
    }
}

// ============================================================================
// 引用解析
// ============================================================================

/// 解析作者引用：ID 必须存在；名称不存在时创建
pub(crate) async fn resolve_author(
    repo: &dyn AuthorRepositoryPort,
    reference: CatalogRef,
) -> Result<Author, ApplicationError> {
    match reference {
        CatalogRef::Id(id) => repo
            .find(&Filter::new().by_id(id))
            .await?
            .ok_or_else(|| ApplicationError::validation(format!("author not found: {}", id))),
        CatalogRef::Name(name) => {
            let name = catalog_name(&name)?;
            if let Some(author) = repo.find(&Filter::new().by_name(name.clone())).await? {
                return Ok(author);
            }
            match repo.create(&name).await {
                Ok(author) => {
                    tracing::info!(
                        author_id = author.id,
                        name = %author.name,
                        "Author created implicitly"
                    );
                    Ok(author)
                }
                // 并发请求先插入了同名作者
                Err(RepositoryError::Duplicate(what)) => repo
                    .find(&Filter::new().by_name(name))
                    .await?
                    .ok_or_else(|| ApplicationError::conflict(format!("already exists: {what}"))),
                Err(e) => Err(e.into()),
            }
        }
    }
}

/// 解析出版社引用
pub(crate) async fn resolve_publisher(
    repo: &dyn PublisherRepositoryPort,
    reference: CatalogRef,
) -> Result<Publisher, ApplicationError> {
    match reference {
        CatalogRef::Id(id) => repo
            .find(&Filter::new().by_id(id))
            .await?
            .ok_or_else(|| ApplicationError::validation(format!("publisher not found: {}", id))),
        CatalogRef::Name(name) => {
            let name = catalog_name(&name)?;
            if let Some(publisher) = repo.find(&Filter::new().by_name(name.clone())).await? {
                return Ok(publisher);
            }
            match repo.create(&name).await {
                Ok(publisher) => {
                    tracing::info!(
                        publisher_id = publisher.id,
                        name = %publisher.name,
                        "Publisher created implicitly"
                    );
                    Ok(publisher)
                }
                Err(RepositoryError::Duplicate(what)) => repo
                    .find(&Filter::new().by_name(name))
                    .await?
                    .ok_or_else(|| ApplicationError::conflict(format!("already exists: {what}"))),
                Err(e) => Err(e.into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::domain::{AccountId, CountedAuthor, CountedPublisher};

    /// 模拟另一个请求抢先插入：首次查找为空，插入报重复，之后可查到
    struct RacedCatalogRepo {
        lookups: AtomicUsize,
    }

    impl RacedCatalogRepo {
        fn new() -> Self {
            Self {
                lookups: AtomicUsize::new(0),
            }
        }

        fn lookup(&self) -> bool {
            self.lookups.fetch_add(1, Ordering::SeqCst) > 0
        }
    }

    fn author(name: &str) -> Author {
        let now = Utc::now();
        Author {
            id: 42,
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn publisher(name: &str) -> Publisher {
        let now = Utc::now();
        Publisher {
            id: 43,
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[async_trait]
    impl AuthorRepositoryPort for RacedCatalogRepo {
        async fn find_all_counted(
            &self,
            _account_id: &AccountId,
        ) -> Result<Vec<CountedAuthor>, RepositoryError> {
            Ok(Vec::new())
        }

        async fn find(&self, _filter: &Filter) -> Result<Option<Author>, RepositoryError> {
            Ok(self.lookup().then(|| author("Le Guin")))
        }

        async fn create(&self, name: &str) -> Result<Author, RepositoryError> {
            Err(RepositoryError::Duplicate(format!("authors.name = {name}")))
        }
    }

    #[async_trait]
    impl PublisherRepositoryPort for RacedCatalogRepo {
        async fn find_all_counted(
            &self,
            _account_id: &AccountId,
        ) -> Result<Vec<CountedPublisher>, RepositoryError> {
            Ok(Vec::new())
        }

        async fn find(&self, _filter: &Filter) -> Result<Option<Publisher>, RepositoryError> {
            Ok(self.lookup().then(|| publisher("Ace")))
        }

        async fn create(&self, name: &str) -> Result<Publisher, RepositoryError> {
            Err(RepositoryError::Duplicate(format!("publishers.name = {name}")))
        }
    }

    /// 插入一直报重复但查不到
    struct AlwaysDuplicateRepo;

    #[async_trait]
    impl AuthorRepositoryPort for AlwaysDuplicateRepo {
        async fn find_all_counted(
            &self,
            _account_id: &AccountId,
        ) -> Result<Vec<CountedAuthor>, RepositoryError> {
            Ok(Vec::new())
        }

        async fn find(&self, _filter: &Filter) -> Result<Option<Author>, RepositoryError> {
            Ok(None)
        }

        async fn create(&self, _name: &str) -> Result<Author, RepositoryError> {
            Err(RepositoryError::Duplicate("authors.name".to_string()))
        }
    }

    #[tokio::test]
    async fn test_resolve_author_reuses_concurrently_created_name() {
        let repo = RacedCatalogRepo::new();

        let author = resolve_author(&repo, CatalogRef::Name("Le Guin".to_string()))
            .await
            .unwrap();

        assert_eq!(author.id, 42);
        assert_eq!(repo.lookups.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_resolve_publisher_reuses_concurrently_created_name() {
        let repo = RacedCatalogRepo::new();

        let publisher = resolve_publisher(&repo, CatalogRef::Name("Ace".to_string()))
            .await
            .unwrap();

        assert_eq!(publisher.id, 43);
        assert_eq!(repo.lookups.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_resolve_author_conflict_when_name_still_missing() {
        let result =
            resolve_author(&AlwaysDuplicateRepo, CatalogRef::Name("Ghost".to_string())).await;
        assert!(matches!(result, Err(ApplicationError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_resolve_author_by_unknown_id_is_validation_error() {
        let result = resolve_author(&AlwaysDuplicateRepo, CatalogRef::Id(9)).await;
        assert!(matches!(result, Err(ApplicationError::ValidationError(_))));
    }
}
