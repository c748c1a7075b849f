//! Data models for the Bookstore API

pub mod author;
pub mod book;
pub mod user;

// Re-export commonly used types
pub use author::{Author, AuthorDto, NewAuthor};
pub use book::{Book, BookDto, NewBook};
pub use user::{Claims, UserCredential};
