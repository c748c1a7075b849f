//! Repository layer for database operations

pub mod authors;
pub mod books;
pub mod memory;
pub mod users;

use std::sync::Arc;

use sqlx::{Pool, Postgres};

pub use authors::AuthorRepository;
pub use books::BookRepository;
pub use users::UserStore;

use crate::error::RepoResult;

/// Postgres-backed storage; implements every repository trait
#[derive(Clone)]
pub struct PgRepository {
    pub pool: Pool<Postgres>,
}

impl PgRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Repositories handed to the services
#[derive(Clone)]
pub struct Repository {
    pub authors: Arc<dyn AuthorRepository>,
    pub books: Arc<dyn BookRepository>,
    pub users: Arc<dyn UserStore>,
    pool: Option<Pool<Postgres>>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        let pg = Arc::new(PgRepository::new(pool.clone()));
        Self {
            authors: pg.clone(),
            books: pg.clone(),
            users: pg,
            pool: Some(pool),
        }
    }

    /// Repository over fresh in-memory tables
    pub fn in_memory() -> Self {
        let store = Arc::new(memory::MemoryRepository::new());
        Self {
            authors: store.clone(),
            books: store.clone(),
            users: store,
            pool: None,
        }
    }

    /// Assemble from arbitrary implementations
    pub fn from_parts(
        authors: Arc<dyn AuthorRepository>,
        books: Arc<dyn BookRepository>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            authors,
            books,
            users,
            pool: None,
        }
    }

    /// Check storage connectivity
    pub async fn ping(&self) -> RepoResult<()> {
        if let Some(pool) = &self.pool {
            sqlx::query("SELECT 1").execute(pool).await?;
        }
        Ok(())
    }
}
