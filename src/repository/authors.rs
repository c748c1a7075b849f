//! Author persistence

use async_trait::async_trait;

use super::PgRepository;
use crate::{
    error::{RepoResult, RepositoryError},
    models::author::{Author, NewAuthor},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorRepository: Send + Sync {
    /// All authors ordered by id
    async fn find_all(&self) -> RepoResult<Vec<Author>>;

    async fn find_by_id(&self, id: i32) -> RepoResult<Option<Author>>;

    async fn exists(&self, id: i32) -> RepoResult<bool>;

    /// Insert and return the stored row with its assigned id
    async fn create(&self, author: &NewAuthor) -> RepoResult<Author>;

    /// Replace every column of `author.id`
    async fn update(&self, author: &Author) -> RepoResult<Author>;

    /// Remove and return the deleted row; books keep existing with no author
    async fn delete(&self, id: i32) -> RepoResult<Author>;
}

#[async_trait]
impl AuthorRepository for PgRepository {
    async fn find_all(&self) -> RepoResult<Vec<Author>> {
        let rows = sqlx::query_as::<_, Author>(
            "SELECT id, firstname, lastname FROM authors ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(RepositoryError::from_sqlx)?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: i32) -> RepoResult<Option<Author>> {
        let row = sqlx::query_as::<_, Author>(
            "SELECT id, firstname, lastname FROM authors WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::from_sqlx)?;
        Ok(row)
    }

    async fn exists(&self, id: i32) -> RepoResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM authors WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(RepositoryError::from_sqlx)?;
        Ok(exists)
    }

    async fn create(&self, author: &NewAuthor) -> RepoResult<Author> {
        let row = sqlx::query_as::<_, Author>(
            r#"
            INSERT INTO authors (firstname, lastname)
            VALUES ($1, $2)
            RETURNING id, firstname, lastname
            "#,
        )
        .bind(&author.firstname)
        .bind(&author.lastname)
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::from_sqlx)?;
        Ok(row)
    }

    async fn update(&self, author: &Author) -> RepoResult<Author> {
        sqlx::query_as::<_, Author>(
            r#"
            UPDATE authors SET firstname = $2, lastname = $3
            WHERE id = $1
            RETURNING id, firstname, lastname
            "#,
        )
        .bind(author.id)
        .bind(&author.firstname)
        .bind(&author.lastname)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::from_sqlx)?
        .ok_or(RepositoryError::NotFound {
            entity: "Author",
            id: author.id,
        })
    }

    async fn delete(&self, id: i32) -> RepoResult<Author> {
        sqlx::query_as::<_, Author>(
            "DELETE FROM authors WHERE id = $1 RETURNING id, firstname, lastname",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::from_sqlx)?
        .ok_or(RepositoryError::NotFound { entity: "Author", id })
    }
}
