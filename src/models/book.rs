//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use super::author::AuthorSummary;
use crate::validation;

pub const TITLE_MAX_LEN: usize = 255;
pub const ISBN_MAX_LEN: usize = 50;
pub const SUMMARY_MAX_LEN: usize = 500;
pub const IMAGE_MAX_LEN: usize = 255;

/// Book row as stored
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub year: Option<i32>,
    pub isbn: String,
    pub summary: Option<String>,
    pub image: Option<String>,
    pub author_id: Option<i32>,
}

/// Book fields before storage assigns an id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub year: Option<i32>,
    pub isbn: String,
    pub summary: Option<String>,
    pub image: Option<String>,
    pub author_id: Option<i32>,
}

/// Book as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct BookDto {
    pub id: i32,
    pub title: String,
    pub year: Option<i32>,
    pub isbn: String,
    pub summary: Option<String>,
    /// Path of the cover image
    pub image: Option<String>,
    pub author_id: Option<i32>,
    #[serde(default)]
    pub author: Option<AuthorSummary>,
}

/// Short book embedded in author responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct BookSummary {
    pub id: i32,
    pub title: String,
    pub year: Option<i32>,
    pub isbn: String,
}

/// Create book request
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct CreateBook {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub author_id: Option<i32>,
}

/// Update book request (full replacement)
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateBook {
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub author_id: Option<i32>,
}

struct BookFields<'a> {
    title: Option<&'a str>,
    year: Option<i32>,
    isbn: Option<&'a str>,
    summary: Option<&'a str>,
    image: Option<&'a str>,
    author_id: Option<i32>,
}

impl BookFields<'_> {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validation::required_text(&mut errors, "title", self.title, TITLE_MAX_LEN);
        validation::required_text(&mut errors, "isbn", self.isbn, ISBN_MAX_LEN);
        validation::optional_range(&mut errors, "year", self.year, 1, 9999);
        validation::optional_text(&mut errors, "summary", self.summary, SUMMARY_MAX_LEN);
        validation::optional_text(&mut errors, "image", self.image, IMAGE_MAX_LEN);
        validation::optional_range(&mut errors, "author_id", self.author_id, 1, i32::MAX);
        validation::finish(errors)
    }
}

impl Validate for CreateBook {
    fn validate(&self) -> Result<(), ValidationErrors> {
        BookFields {
            title: self.title.as_deref(),
            year: self.year,
            isbn: self.isbn.as_deref(),
            summary: self.summary.as_deref(),
            image: self.image.as_deref(),
            author_id: self.author_id,
        }
        .validate()
    }
}

impl Validate for UpdateBook {
    fn validate(&self) -> Result<(), ValidationErrors> {
        BookFields {
            title: self.title.as_deref(),
            year: self.year,
            isbn: self.isbn.as_deref(),
            summary: self.summary.as_deref(),
            image: self.image.as_deref(),
            author_id: self.author_id,
        }
        .validate()
    }
}

// Mapping. Request conversions assume the DTO passed `validate()`.

impl From<Book> for BookDto {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            year: book.year,
            isbn: book.isbn,
            summary: book.summary,
            image: book.image,
            author_id: book.author_id,
            author: None,
        }
    }
}

impl From<Book> for BookSummary {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            year: book.year,
            isbn: book.isbn,
        }
    }
}

impl From<CreateBook> for NewBook {
    fn from(dto: CreateBook) -> Self {
        Self {
            title: dto.title.unwrap_or_default(),
            year: dto.year,
            isbn: dto.isbn.unwrap_or_default(),
            summary: dto.summary,
            image: dto.image,
            author_id: dto.author_id,
        }
    }
}

impl From<UpdateBook> for Book {
    fn from(dto: UpdateBook) -> Self {
        Self {
            id: dto.id.unwrap_or_default(),
            title: dto.title.unwrap_or_default(),
            year: dto.year,
            isbn: dto.isbn.unwrap_or_default(),
            summary: dto.summary,
            image: dto.image,
            author_id: dto.author_id,
        }
    }
}

impl BookDto {
    pub fn with_author(mut self, author: Option<AuthorSummary>) -> Self {
        self.author = author;
        self
    }
}
