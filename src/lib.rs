//! Bookstore API
//!
//! A REST JSON API for managing a catalog of books and authors, with
//! JWT-based user authentication.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod repository;
pub mod services;
pub mod validation;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

use logging::Logger;
use repository::Repository;
use services::Services;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<Services>,
    pub logger: Arc<dyn Logger>,
}

impl AppState {
    pub fn new(config: AppConfig, repository: Repository, logger: Arc<dyn Logger>) -> Self {
        let services = Services::new(repository, config.auth.clone(), logger.clone());
        Self {
            config: Arc::new(config),
            services: Arc::new(services),
            logger,
        }
    }
}
