use std::sync::Arc;

use async_trait::async_trait;
use bookstore_api::{
    error::{RepoResult, RepositoryError, INTERNAL_ERROR_MESSAGE},
    models::author::{Author, NewAuthor},
    repository::{memory::MemoryRepository, AuthorRepository, Repository},
};
use serde_json::{json, Value};
use tracing::Level;

use crate::common::spawn_app_on;

/// Author table whose every call fails like a dropped connection
struct UnreachableAuthors;

fn unreachable<T>() -> RepoResult<T> {
    Err(RepositoryError::Database(sqlx::Error::PoolTimedOut))
}

#[async_trait]
impl AuthorRepository for UnreachableAuthors {
    async fn find_all(&self) -> RepoResult<Vec<Author>> {
        unreachable()
    }

    async fn find_by_id(&self, _id: i32) -> RepoResult<Option<Author>> {
        unreachable()
    }

    async fn exists(&self, _id: i32) -> RepoResult<bool> {
        unreachable()
    }

    async fn create(&self, _author: &NewAuthor) -> RepoResult<Author> {
        unreachable()
    }

    async fn update(&self, _author: &Author) -> RepoResult<Author> {
        unreachable()
    }

    async fn delete(&self, _id: i32) -> RepoResult<Author> {
        unreachable()
    }
}

fn broken_repository() -> Repository {
    let memory = Arc::new(MemoryRepository::new());
    Repository::from_parts(Arc::new(UnreachableAuthors), memory.clone(), memory)
}

#[tokio::test]
async fn test_storage_failure_is_generic_500() {
    let app = spawn_app_on(broken_repository(), |_| {}).await;

    for response in [
        app.get("/api/authors").await,
        app.get("/api/authors/1").await,
        app.post("/api/authors", &json!({ "firstname": "Frank", "lastname": "Herbert" }))
            .await,
        app.delete("/api/authors/1").await,
        app.get("/api/books").await,
    ] {
        assert_eq!(response.status(), 500);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["message"], INTERNAL_ERROR_MESSAGE);
        assert!(!body.to_string().contains("pool timed out"));
    }

    assert_eq!(app.logger.at_level(Level::ERROR).len(), 5);
}
