//! Identity store

use async_trait::async_trait;
use uuid::Uuid;

use super::PgRepository;
use crate::{
    error::{RepoResult, RepositoryError},
    models::user::{NewUser, UserCredential},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Case-insensitive username lookup
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<UserCredential>>;

    /// `Conflict` when the username is taken
    async fn create(&self, user: &NewUser) -> RepoResult<UserCredential>;
}

#[async_trait]
impl UserStore for PgRepository {
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<UserCredential>> {
        let user = sqlx::query_as::<_, UserCredential>(
            r#"
            SELECT id, username, email, password_hash, roles, created_at
            FROM users WHERE LOWER(username) = LOWER($1)
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::from_sqlx)?;

        Ok(user)
    }

    async fn create(&self, user: &NewUser) -> RepoResult<UserCredential> {
        let row = sqlx::query_as::<_, UserCredential>(
            r#"
            INSERT INTO users (id, username, email, password_hash, roles)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, username, email, password_hash, roles, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.roles)
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::from_sqlx)?;

        Ok(row)
    }
}
