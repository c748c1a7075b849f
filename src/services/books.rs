//! Book catalog service

use std::{collections::HashMap, sync::Arc};

use validator::{Validate, ValidationError, ValidationErrors};

use super::{fault, repository_failure};
use crate::{
    error::{AppError, AppResult, RepositoryError},
    logging::Logger,
    models::{
        author::AuthorSummary,
        book::{Book, BookDto, CreateBook, NewBook, UpdateBook},
    },
    repository::Repository,
};

fn unknown_author(author_id: i32) -> AppError {
    let mut err = ValidationError::new("unknown_author");
    err.message = Some(format!("author {} does not exist", author_id).into());
    let mut errors = ValidationErrors::new();
    errors.add("author_id", err);
    AppError::Validation(errors)
}

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
    logger: Arc<dyn Logger>,
}

impl BooksService {
    pub fn new(repository: Repository, logger: Arc<dyn Logger>) -> Self {
        Self { repository, logger }
    }

    /// All books with their authors embedded
    pub async fn list(&self) -> AppResult<Vec<BookDto>> {
        let location = "Books - GetBooks";
        self.logger.info(location, "Attempted to retrieve all books");

        let books = self
            .repository
            .books
            .find_all()
            .await
            .map_err(|e| fault(self.logger.as_ref(), location, e))?;
        let authors: HashMap<i32, AuthorSummary> = self
            .repository
            .authors
            .find_all()
            .await
            .map_err(|e| fault(self.logger.as_ref(), location, e))?
            .iter()
            .map(|a| (a.id, AuthorSummary::from(a)))
            .collect();

        let response: Vec<BookDto> = books
            .into_iter()
            .map(|book| {
                let author = book.author_id.and_then(|id| authors.get(&id).cloned());
                BookDto::from(book).with_author(author)
            })
            .collect();

        self.logger
            .info(location, &format!("Successfully returned {} books", response.len()));
        Ok(response)
    }

    pub async fn get(&self, id: i32) -> AppResult<BookDto> {
        let location = "Books - GetBook";
        self.logger
            .info(location, &format!("Attempted call for id {}", id));

        let book = self
            .repository
            .books
            .find_by_id(id)
            .await
            .map_err(|e| fault(self.logger.as_ref(), location, e))?;
        let Some(book) = book else {
            self.logger
                .warn(location, &format!("Failed to retrieve record with id {}", id));
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        };

        let author = self.author_of(location, &book).await?;

        self.logger
            .info(location, &format!("Successfully got record with id {}", id));
        Ok(BookDto::from(book).with_author(author))
    }

    pub async fn create(&self, request: CreateBook) -> AppResult<BookDto> {
        let location = "Books - Create";
        self.logger.info(location, "Create a new book attempted");

        if let Err(errors) = request.validate() {
            self.logger
                .warn(location, &format!("Invalid request submitted: {}", errors));
            return Err(errors.into());
        }

        let author = self.require_author(location, request.author_id).await?;

        let created = self
            .repository
            .books
            .create(&NewBook::from(request))
            .await
            .map_err(|e| self.write_failure(location, e))?;

        self.logger
            .info(location, &format!("Creation successful, book id {}", created.id));
        Ok(BookDto::from(created).with_author(author))
    }

    /// Full replacement of an existing book; the path id must match the body id
    pub async fn update(&self, id: i32, request: UpdateBook) -> AppResult<()> {
        let location = "Books - Update";
        self.logger
            .info(location, &format!("Update attempted with book id {}", id));

        if id < 1 || request.id != Some(id) {
            self.logger.warn(
                location,
                &format!("Update attempted with bad data: path id {}, body id {:?}", id, request.id),
            );
            return Err(AppError::BadRequest(
                "Path id must be positive and equal to the body id".to_string(),
            ));
        }

        let exists = self
            .repository
            .books
            .exists(id)
            .await
            .map_err(|e| fault(self.logger.as_ref(), location, e))?;
        if !exists {
            self.logger
                .warn(location, &format!("Book record not found with id {}", id));
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }

        if let Err(errors) = request.validate() {
            self.logger
                .warn(location, &format!("Invalid book information for update: {}", errors));
            return Err(errors.into());
        }

        self.require_author(location, request.author_id).await?;

        let book = Book::from(request);
        self.repository
            .books
            .update(&book)
            .await
            .map_err(|e| self.write_failure(location, e))?;

        self.logger
            .info(location, &format!("Book record with id {} is updated", id));
        Ok(())
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let location = "Books - Delete";
        self.logger
            .info(location, &format!("Delete attempted on record with id {}", id));

        if id < 1 {
            self.logger
                .warn(location, &format!("Delete failed with bad data, id {}", id));
            return Err(AppError::BadRequest("Id must be positive".to_string()));
        }

        let exists = self
            .repository
            .books
            .exists(id)
            .await
            .map_err(|e| fault(self.logger.as_ref(), location, e))?;
        if !exists {
            self.logger
                .warn(location, &format!("Delete failed, no record found with id {}", id));
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }

        self.repository
            .books
            .delete(id)
            .await
            .map_err(|e| repository_failure(self.logger.as_ref(), location, e))?;

        self.logger
            .info(location, &format!("Delete successful, book record with id {}", id));
        Ok(())
    }

    async fn author_of(&self, location: &str, book: &Book) -> AppResult<Option<AuthorSummary>> {
        let Some(author_id) = book.author_id else {
            return Ok(None);
        };
        let author = self
            .repository
            .authors
            .find_by_id(author_id)
            .await
            .map_err(|e| fault(self.logger.as_ref(), location, e))?;
        Ok(author.as_ref().map(AuthorSummary::from))
    }

    /// Resolve a referenced author, rejecting unknown ids as a field error
    async fn require_author(&self, location: &str, author_id: Option<i32>) -> AppResult<Option<AuthorSummary>> {
        let Some(author_id) = author_id else {
            return Ok(None);
        };
        let author = self
            .repository
            .authors
            .find_by_id(author_id)
            .await
            .map_err(|e| fault(self.logger.as_ref(), location, e))?;
        match author {
            Some(author) => Ok(Some(AuthorSummary::from(&author))),
            None => {
                self.logger
                    .warn(location, &format!("Referenced author {} does not exist", author_id));
                Err(unknown_author(author_id))
            }
        }
    }

    fn write_failure(&self, location: &str, err: RepositoryError) -> AppError {
        match err {
            // Author removed between the reference check and the write
            RepositoryError::ForeignKey(detail) => {
                self.logger
                    .warn(location, &format!("Foreign key rejected: {}", detail));
                let mut errors = ValidationErrors::new();
                errors.add("author_id", ValidationError::new("unknown_author"));
                AppError::Validation(errors)
            }
            other => repository_failure(self.logger.as_ref(), location, other),
        }
    }
}
