//! Business logic services

pub mod auth;
pub mod authors;
pub mod books;

use std::sync::Arc;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult, RepositoryError},
    logging::Logger,
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub authors: authors::AuthorsService,
    pub books: books::BooksService,
    pub auth: auth::AuthService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository and logger
    pub fn new(repository: Repository, auth_config: AuthConfig, logger: Arc<dyn Logger>) -> Self {
        Self {
            authors: authors::AuthorsService::new(repository.clone(), logger.clone()),
            books: books::BooksService::new(repository.clone(), logger.clone()),
            auth: auth::AuthService::new(repository.clone(), auth_config, logger),
            repository,
        }
    }

    /// Readiness probe against the storage backend
    pub async fn check_storage(&self) -> AppResult<()> {
        self.repository
            .ping()
            .await
            .map_err(|e| AppError::Unavailable(format!("Storage unreachable: {}", e)))
    }
}

/// Log an unexpected fault and turn it into the generic 500
pub(crate) fn fault(logger: &dyn Logger, location: &str, err: impl std::fmt::Display) -> AppError {
    let detail = format!("{}: {}", location, err);
    logger.error(location, &detail);
    AppError::Internal(detail)
}

/// Map a repository failure: a vanished row is a 404, anything else is a fault
pub(crate) fn repository_failure(logger: &dyn Logger, location: &str, err: RepositoryError) -> AppError {
    match err {
        RepositoryError::NotFound { entity, id } => {
            logger.warn(location, &format!("{} with id {} not found", entity, id));
            AppError::NotFound(format!("{} with id {} not found", entity, id))
        }
        other => fault(logger, location, other),
    }
}
