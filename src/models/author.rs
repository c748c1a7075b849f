//! Author model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use super::book::BookSummary;
use crate::validation;

pub const NAME_MAX_LEN: usize = 100;

/// Author row as stored
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Author {
    pub id: i32,
    pub firstname: String,
    pub lastname: String,
}

/// Author fields before storage assigns an id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuthor {
    pub firstname: String,
    pub lastname: String,
}

/// Author as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct AuthorDto {
    pub id: i32,
    pub firstname: String,
    pub lastname: String,
    /// Only present on single-author lookups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub books: Option<Vec<BookSummary>>,
}

/// Short author embedded in book responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct AuthorSummary {
    pub id: i32,
    pub firstname: String,
    pub lastname: String,
}

/// Create author request
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct CreateAuthor {
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
}

/// Update author request (full replacement)
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateAuthor {
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
}

fn validate_names(firstname: Option<&str>, lastname: Option<&str>) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    validation::required_text(&mut errors, "firstname", firstname, NAME_MAX_LEN);
    validation::required_text(&mut errors, "lastname", lastname, NAME_MAX_LEN);
    validation::finish(errors)
}

impl Validate for CreateAuthor {
    fn validate(&self) -> Result<(), ValidationErrors> {
        validate_names(self.firstname.as_deref(), self.lastname.as_deref())
    }
}

impl Validate for UpdateAuthor {
    fn validate(&self) -> Result<(), ValidationErrors> {
        validate_names(self.firstname.as_deref(), self.lastname.as_deref())
    }
}

// Mapping. Request conversions assume the DTO passed `validate()`.

impl From<Author> for AuthorDto {
    fn from(author: Author) -> Self {
        Self {
            id: author.id,
            firstname: author.firstname,
            lastname: author.lastname,
            books: None,
        }
    }
}

impl From<&Author> for AuthorSummary {
    fn from(author: &Author) -> Self {
        Self {
            id: author.id,
            firstname: author.firstname.clone(),
            lastname: author.lastname.clone(),
        }
    }
}

impl From<CreateAuthor> for NewAuthor {
    fn from(dto: CreateAuthor) -> Self {
        Self {
            firstname: dto.firstname.unwrap_or_default(),
            lastname: dto.lastname.unwrap_or_default(),
        }
    }
}

impl From<UpdateAuthor> for Author {
    fn from(dto: UpdateAuthor) -> Self {
        Self {
            id: dto.id.unwrap_or_default(),
            firstname: dto.firstname.unwrap_or_default(),
            lastname: dto.lastname.unwrap_or_default(),
        }
    }
}
