//! Author endpoints

use axum::{
    extract::State,
    http::{header, HeaderName, StatusCode},
    Json,
};

use crate::{
    error::AppResult,
    models::author::{AuthorDto, CreateAuthor, UpdateAuthor},
    AppState,
};

use super::{JsonBody, RecordId, WriteAccess};

/// List all authors
#[utoipa::path(
    get,
    path = "/api/authors",
    tag = "authors",
    responses(
        (status = 200, description = "List of authors", body = Vec<AuthorDto>),
        (status = 500, description = "Internal error", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_authors(State(state): State<AppState>) -> AppResult<Json<Vec<AuthorDto>>> {
    let authors = state.services.authors.list().await?;
    Ok(Json(authors))
}

/// Get an author with their books
#[utoipa::path(
    get,
    path = "/api/authors/{id}",
    tag = "authors",
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Author details", body = AuthorDto),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> AppResult<Json<AuthorDto>> {
    let author = state.services.authors.get(id).await?;
    Ok(Json(author))
}

/// Create a new author
#[utoipa::path(
    post,
    path = "/api/authors",
    tag = "authors",
    security(("bearer_auth" = [])),
    request_body = CreateAuthor,
    responses(
        (status = 201, description = "Author created", body = AuthorDto),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    _access: WriteAccess,
    JsonBody(request): JsonBody<CreateAuthor>,
) -> AppResult<(StatusCode, [(HeaderName, String); 1], Json<AuthorDto>)> {
    let created = state.services.authors.create(request).await?;
    let location = format!("/api/authors/{}", created.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(created)))
}

/// Replace an author's fields
#[utoipa::path(
    put,
    path = "/api/authors/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    request_body = UpdateAuthor,
    responses(
        (status = 204, description = "Author updated"),
        (status = 400, description = "Invalid input or id mismatch", body = crate::error::ErrorResponse),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_author(
    State(state): State<AppState>,
    _access: WriteAccess,
    RecordId(id): RecordId,
    JsonBody(request): JsonBody<UpdateAuthor>,
) -> AppResult<StatusCode> {
    state.services.authors.update(id, request).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete an author; their books stay in the catalog without an author
#[utoipa::path(
    delete,
    path = "/api/authors/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    responses(
        (status = 204, description = "Author deleted"),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_author(
    State(state): State<AppState>,
    _access: WriteAccess,
    RecordId(id): RecordId,
) -> AppResult<StatusCode> {
    state.services.authors.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
