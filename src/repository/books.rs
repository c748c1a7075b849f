//! Book persistence

use async_trait::async_trait;

use super::PgRepository;
use crate::{
    error::{RepoResult, RepositoryError},
    models::book::{Book, NewBook},
};

const BOOK_COLUMNS: &str = "id, title, year, isbn, summary, image, author_id";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// All books ordered by id
    async fn find_all(&self) -> RepoResult<Vec<Book>>;

    async fn find_by_id(&self, id: i32) -> RepoResult<Option<Book>>;

    async fn find_by_author(&self, author_id: i32) -> RepoResult<Vec<Book>>;

    async fn exists(&self, id: i32) -> RepoResult<bool>;

    /// Insert and return the stored row; `ForeignKey` when `author_id` is unknown
    async fn create(&self, book: &NewBook) -> RepoResult<Book>;

    /// Replace every column of `book.id`
    async fn update(&self, book: &Book) -> RepoResult<Book>;

    async fn delete(&self, id: i32) -> RepoResult<Book>;
}

#[async_trait]
impl BookRepository for PgRepository {
    async fn find_all(&self) -> RepoResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books ORDER BY id",
            BOOK_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(RepositoryError::from_sqlx)?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: i32) -> RepoResult<Option<Book>> {
        let row = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books WHERE id = $1",
            BOOK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::from_sqlx)?;
        Ok(row)
    }

    async fn find_by_author(&self, author_id: i32) -> RepoResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books WHERE author_id = $1 ORDER BY id",
            BOOK_COLUMNS
        ))
        .bind(author_id)
        .fetch_all(&self.pool)
        .await
        .map_err(RepositoryError::from_sqlx)?;
        Ok(rows)
    }

    async fn exists(&self, id: i32) -> RepoResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(RepositoryError::from_sqlx)?;
        Ok(exists)
    }

    async fn create(&self, book: &NewBook) -> RepoResult<Book> {
        let row = sqlx::query_as::<_, Book>(&format!(
            r#"
            INSERT INTO books (title, year, isbn, summary, image, author_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(&book.title)
        .bind(book.year)
        .bind(&book.isbn)
        .bind(&book.summary)
        .bind(&book.image)
        .bind(book.author_id)
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::from_sqlx)?;
        Ok(row)
    }

    async fn update(&self, book: &Book) -> RepoResult<Book> {
        sqlx::query_as::<_, Book>(&format!(
            r#"
            UPDATE books
            SET title = $2, year = $3, isbn = $4, summary = $5, image = $6, author_id = $7
            WHERE id = $1
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(book.id)
        .bind(&book.title)
        .bind(book.year)
        .bind(&book.isbn)
        .bind(&book.summary)
        .bind(&book.image)
        .bind(book.author_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::from_sqlx)?
        .ok_or(RepositoryError::NotFound {
            entity: "Book",
            id: book.id,
        })
    }

    async fn delete(&self, id: i32) -> RepoResult<Book> {
        sqlx::query_as::<_, Book>(&format!(
            "DELETE FROM books WHERE id = $1 RETURNING {}",
            BOOK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::from_sqlx)?
        .ok_or(RepositoryError::NotFound { entity: "Book", id })
    }
}
