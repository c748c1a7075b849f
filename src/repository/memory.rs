//! In-memory storage with the same semantics as the Postgres schema

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AuthorRepository, BookRepository, UserStore};
use crate::{
    error::{RepoResult, RepositoryError},
    models::{
        author::{Author, NewAuthor},
        book::{Book, NewBook},
        user::{NewUser, UserCredential},
    },
};

#[derive(Debug, Default)]
struct Tables {
    authors: BTreeMap<i32, Author>,
    books: BTreeMap<i32, Book>,
    users: Vec<UserCredential>,
    last_author_id: i32,
    last_book_id: i32,
}

impl Tables {
    fn check_author_ref(&self, author_id: Option<i32>) -> RepoResult<()> {
        match author_id {
            Some(id) if !self.authors.contains_key(&id) => Err(RepositoryError::ForeignKey(format!(
                "author_id {} does not reference an author",
                id
            ))),
            _ => Ok(()),
        }
    }
}

/// All tables behind one lock so cross-table rules (foreign keys) stay consistent
#[derive(Debug, Default)]
pub struct MemoryRepository {
    tables: RwLock<Tables>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuthorRepository for MemoryRepository {
    async fn find_all(&self) -> RepoResult<Vec<Author>> {
        Ok(self.tables.read().await.authors.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i32) -> RepoResult<Option<Author>> {
        Ok(self.tables.read().await.authors.get(&id).cloned())
    }

    async fn exists(&self, id: i32) -> RepoResult<bool> {
        Ok(self.tables.read().await.authors.contains_key(&id))
    }

    async fn create(&self, author: &NewAuthor) -> RepoResult<Author> {
        let mut tables = self.tables.write().await;
        tables.last_author_id += 1;
        let row = Author {
            id: tables.last_author_id,
            firstname: author.firstname.clone(),
            lastname: author.lastname.clone(),
        };
        tables.authors.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(&self, author: &Author) -> RepoResult<Author> {
        let mut tables = self.tables.write().await;
        match tables.authors.get_mut(&author.id) {
            Some(row) => {
                *row = author.clone();
                Ok(row.clone())
            }
            None => Err(RepositoryError::NotFound {
                entity: "Author",
                id: author.id,
            }),
        }
    }

    async fn delete(&self, id: i32) -> RepoResult<Author> {
        let mut tables = self.tables.write().await;
        let removed = tables
            .authors
            .remove(&id)
            .ok_or(RepositoryError::NotFound { entity: "Author", id })?;
        // ON DELETE SET NULL
        for book in tables.books.values_mut() {
            if book.author_id == Some(id) {
                book.author_id = None;
            }
        }
        Ok(removed)
    }
}

#[async_trait]
impl BookRepository for MemoryRepository {
    async fn find_all(&self) -> RepoResult<Vec<Book>> {
        Ok(self.tables.read().await.books.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i32) -> RepoResult<Option<Book>> {
        Ok(self.tables.read().await.books.get(&id).cloned())
    }

    async fn find_by_author(&self, author_id: i32) -> RepoResult<Vec<Book>> {
        Ok(self
            .tables
            .read()
            .await
            .books
            .values()
            .filter(|b| b.author_id == Some(author_id))
            .cloned()
            .collect())
    }

    async fn exists(&self, id: i32) -> RepoResult<bool> {
        Ok(self.tables.read().await.books.contains_key(&id))
    }

    async fn create(&self, book: &NewBook) -> RepoResult<Book> {
        let mut tables = self.tables.write().await;
        tables.check_author_ref(book.author_id)?;
        tables.last_book_id += 1;
        let row = Book {
            id: tables.last_book_id,
            title: book.title.clone(),
            year: book.year,
            isbn: book.isbn.clone(),
            summary: book.summary.clone(),
            image: book.image.clone(),
            author_id: book.author_id,
        };
        tables.books.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(&self, book: &Book) -> RepoResult<Book> {
        let mut tables = self.tables.write().await;
        tables.check_author_ref(book.author_id)?;
        match tables.books.get_mut(&book.id) {
            Some(row) => {
                *row = book.clone();
                Ok(row.clone())
            }
            None => Err(RepositoryError::NotFound {
                entity: "Book",
                id: book.id,
            }),
        }
    }

    async fn delete(&self, id: i32) -> RepoResult<Book> {
        self.tables
            .write()
            .await
            .books
            .remove(&id)
            .ok_or(RepositoryError::NotFound { entity: "Book", id })
    }
}

#[async_trait]
impl UserStore for MemoryRepository {
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<UserCredential>> {
        Ok(self
            .tables
            .read()
            .await
            .users
            .iter()
            .find(|u| u.username.eq_ignore_ascii_case(username))
            .cloned())
    }

    async fn create(&self, user: &NewUser) -> RepoResult<UserCredential> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .iter()
            .any(|u| u.username.eq_ignore_ascii_case(&user.username))
        {
            return Err(RepositoryError::Conflict(format!(
                "username {} already exists",
                user.username
            )));
        }
        let row = UserCredential {
            id: Uuid::new_v4(),
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            roles: user.roles.clone(),
            created_at: Utc::now(),
        };
        tables.users.push(row.clone());
        Ok(row)
    }
}
