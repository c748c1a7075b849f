//! API handlers for the Bookstore REST endpoints

pub mod authors;
pub mod books;
pub mod health;
pub mod openapi;
pub mod users;

use std::any::Any;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{header::AUTHORIZATION, request::Parts},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::de::DeserializeOwned;
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, logging::Logger, models::user::Claims, AppState};

/// JSON body extractor that reports missing or malformed bodies as 400
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T> FromRequest<AppState> for JsonBody<T>
where
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => {
                let detail = rejection.body_text();
                state
                    .logger
                    .warn("Request", &format!("Rejected request body: {}", detail));
                Err(AppError::BadRequest(detail))
            }
        }
    }
}

/// Integer record id from the path; anything else names no record (404)
pub struct RecordId(pub i32);

#[async_trait]
impl FromRequestParts<AppState> for RecordId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match Path::<i32>::from_request_parts(parts, state).await {
            Ok(Path(id)) => Ok(RecordId(id)),
            Err(rejection) => {
                let detail = rejection.body_text();
                state
                    .logger
                    .warn("Request", &format!("Rejected path id: {}", detail));
                Err(AppError::NotFound(detail))
            }
        }
    }
}

/// Gate for catalog mutations.
///
/// Passes through unless `auth.protect_writes` is set; then a valid bearer
/// token (and `auth.write_role`, when configured) is required.
pub struct WriteAccess(pub Option<Claims>);

#[async_trait]
impl FromRequestParts<AppState> for WriteAccess {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth = &state.config.auth;
        if !auth.protect_writes {
            return Ok(WriteAccess(None));
        }

        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| {
                state.logger.warn("Request", "Write attempted without bearer token");
                AppError::Authentication("Missing or invalid authorization header".to_string())
            })?;

        let claims = state.services.auth.verify_token(token).map_err(|e| {
            state
                .logger
                .warn("Request", &format!("Write attempted with rejected token: {}", e));
            e
        })?;

        if let Some(role) = &auth.write_role {
            if !claims.has_role(role) {
                state.logger.warn(
                    "Request",
                    &format!("User {} lacks role {} for writes", claims.sub, role),
                );
                return Err(AppError::Authorization(format!("Role {} required", role)));
            }
        }

        Ok(WriteAccess(Some(claims)))
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    let logger = state.logger.clone();
    let catch_panic = CatchPanicLayer::custom(move |panic: Box<dyn Any + Send + 'static>| {
        let detail = panic
            .downcast_ref::<String>()
            .cloned()
            .or_else(|| panic.downcast_ref::<&str>().map(|s| s.to_string()))
            .unwrap_or_else(|| "unknown panic payload".to_string());
        logger.error("Request", &format!("Handler panicked: {}", detail));
        AppError::Internal(detail).into_response()
    });

    let api = Router::new()
        // Authors
        .route(
            "/authors",
            get(authors::list_authors).post(authors::create_author),
        )
        .route(
            "/authors/:id",
            get(authors::get_author)
                .put(authors::update_author)
                .delete(authors::delete_author),
        )
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route(
            "/books/:id",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        // Authentication
        .route("/users", post(users::login));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .nest("/api", api)
        .with_state(state)
        .merge(openapi::create_openapi_router())
        .layer(catch_panic)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
