//! Author catalog service

use std::sync::Arc;

use validator::Validate;

use super::{fault, repository_failure};
use crate::{
    error::{AppError, AppResult},
    logging::Logger,
    models::{
        author::{Author, AuthorDto, CreateAuthor, NewAuthor, UpdateAuthor},
        book::BookSummary,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
    logger: Arc<dyn Logger>,
}

impl AuthorsService {
    pub fn new(repository: Repository, logger: Arc<dyn Logger>) -> Self {
        Self { repository, logger }
    }

    /// All authors, without their books
    pub async fn list(&self) -> AppResult<Vec<AuthorDto>> {
        let location = "Authors - GetAuthors";
        self.logger.info(location, "Attempted to get all authors");

        let authors = self
            .repository
            .authors
            .find_all()
            .await
            .map_err(|e| fault(self.logger.as_ref(), location, e))?;
        let response: Vec<AuthorDto> = authors.into_iter().map(AuthorDto::from).collect();

        self.logger
            .info(location, &format!("Successfully got {} authors", response.len()));
        Ok(response)
    }

    /// One author with the books that reference it
    pub async fn get(&self, id: i32) -> AppResult<AuthorDto> {
        let location = "Authors - GetAuthor";
        self.logger
            .info(location, &format!("Attempted to get author with id {}", id));

        let author = self
            .repository
            .authors
            .find_by_id(id)
            .await
            .map_err(|e| fault(self.logger.as_ref(), location, e))?;
        let Some(author) = author else {
            self.logger
                .warn(location, &format!("Author not found with id {}", id));
            return Err(AppError::NotFound(format!("Author with id {} not found", id)));
        };

        let books = self
            .repository
            .books
            .find_by_author(id)
            .await
            .map_err(|e| fault(self.logger.as_ref(), location, e))?;

        let mut response = AuthorDto::from(author);
        response.books = Some(books.into_iter().map(BookSummary::from).collect());

        self.logger
            .info(location, &format!("Successfully got author with id {}", id));
        Ok(response)
    }

    pub async fn create(&self, request: CreateAuthor) -> AppResult<AuthorDto> {
        let location = "Authors - Create";
        self.logger.info(location, "Attempted to create an author");

        if let Err(errors) = request.validate() {
            self.logger
                .warn(location, &format!("Attempted to create an invalid author: {}", errors));
            return Err(errors.into());
        }

        let created = self
            .repository
            .authors
            .create(&NewAuthor::from(request))
            .await
            .map_err(|e| fault(self.logger.as_ref(), location, e))?;

        self.logger
            .info(location, &format!("Author created with id {}", created.id));
        Ok(AuthorDto::from(created))
    }

    /// Full replacement; the path id must match the body id
    pub async fn update(&self, id: i32, request: UpdateAuthor) -> AppResult<()> {
        let location = "Authors - Update";
        self.logger
            .info(location, &format!("Author update attempted with id {}", id));

        if id < 1 || request.id != Some(id) {
            self.logger.warn(
                location,
                &format!("Attempted to update an invalid author: path id {}, body id {:?}", id, request.id),
            );
            return Err(AppError::BadRequest(
                "Path id must be positive and equal to the body id".to_string(),
            ));
        }

        if let Err(errors) = request.validate() {
            self.logger
                .warn(location, &format!("Invalid author information for update: {}", errors));
            return Err(errors.into());
        }

        let author = Author::from(request);
        self.repository
            .authors
            .update(&author)
            .await
            .map_err(|e| repository_failure(self.logger.as_ref(), location, e))?;

        self.logger
            .info(location, &format!("Author with id {} updated", id));
        Ok(())
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let location = "Authors - Delete";
        self.logger
            .info(location, &format!("Attempted to delete author with id {}", id));

        if id < 1 {
            self.logger
                .warn(location, &format!("Invalid author id {} for deletion", id));
            return Err(AppError::BadRequest("Id must be positive".to_string()));
        }

        let exists = self
            .repository
            .authors
            .exists(id)
            .await
            .map_err(|e| fault(self.logger.as_ref(), location, e))?;
        if !exists {
            self.logger
                .warn(location, &format!("There is no author with id {} for deletion", id));
            return Err(AppError::NotFound(format!("Author with id {} not found", id)));
        }

        self.repository
            .authors
            .delete(id)
            .await
            .map_err(|e| repository_failure(self.logger.as_ref(), location, e))?;

        self.logger
            .info(location, &format!("Author deleted with id {}", id));
        Ok(())
    }
}
