//! Authentication service: credential checks, token issuance, user seeding

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use once_cell::sync::Lazy;

use super::fault;
use crate::{
    config::{AuthConfig, SeedUser},
    error::{AppError, AppResult, RepositoryError},
    logging::Logger,
    models::user::{Claims, LoginRequest, LoginResponse, NewUser, UserCredential},
    repository::Repository,
};

/// Tokens expire this long after issuance
pub const TOKEN_LIFETIME_MINUTES: i64 = 5;

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Checked against on unknown usernames so every failed login costs one Argon2 verification
static DUMMY_HASH: Lazy<Option<String>> = Lazy::new(|| {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(b"no-such-user", &salt)
        .ok()
        .map(|hash| hash.to_string())
});

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
    logger: Arc<dyn Logger>,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig, logger: Arc<dyn Logger>) -> Self {
        Self {
            repository,
            config,
            logger,
        }
    }

    /// Check credentials and issue a signed token.
    ///
    /// Every failure looks the same to the caller.
    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        let location = "Users - Login";
        self.logger
            .info(location, &format!("Login attempted for user {}", request.username));

        let user = self
            .repository
            .users
            .find_by_username(&request.username)
            .await
            .map_err(|e| fault(self.logger.as_ref(), location, e))?;

        let Some(user) = user else {
            verify_against_dummy(&request.password);
            self.logger
                .warn(location, &format!("Login failed for {}: unknown user", request.username));
            return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
        };

        if !self.verify_password(location, &user, &request.password) {
            self.logger
                .warn(location, &format!("Login failed for {}: wrong password", request.username));
            return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
        }

        let token = self.issue_token(location, &user)?;

        self.logger
            .info(location, &format!("User {} successfully authenticated", user.username));
        Ok(LoginResponse { token })
    }

    /// Decode and validate a bearer token
    pub fn verify_token(&self, token: &str) -> AppResult<Claims> {
        Claims::from_token(token, &self.config.jwt_secret, &self.config.jwt_issuer)
            .map_err(|e| AppError::Authentication(format!("Invalid token: {}", e)))
    }

    /// Create the configured users whose usernames are still free; returns how many were added
    pub async fn seed_users(&self, users: &[SeedUser]) -> AppResult<usize> {
        let location = "Users - Seed";
        let mut created = 0;

        for seed in users {
            let existing = self
                .repository
                .users
                .find_by_username(&seed.username)
                .await
                .map_err(|e| fault(self.logger.as_ref(), location, e))?;
            if existing.is_some() {
                self.logger
                    .debug(location, &format!("User {} already exists", seed.username));
                continue;
            }

            let new_user = NewUser {
                username: seed.username.clone(),
                email: seed.email.clone(),
                password_hash: self.hash_password(location, &seed.password)?,
                roles: seed.roles.clone(),
            };

            match self.repository.users.create(&new_user).await {
                Ok(user) => {
                    self.logger
                        .info(location, &format!("Seeded user {}", user.username));
                    created += 1;
                }
                // Another instance seeded it first
                Err(RepositoryError::Conflict(_)) => {}
                Err(e) => return Err(fault(self.logger.as_ref(), location, e)),
            }
        }

        Ok(created)
    }

    fn issue_token(&self, location: &str, user: &UserCredential) -> AppResult<String> {
        let claims = Claims::for_user(
            user,
            &self.config.jwt_issuer,
            Utc::now(),
            Duration::minutes(TOKEN_LIFETIME_MINUTES),
        );
        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| fault(self.logger.as_ref(), location, format!("Failed to create token: {}", e)))
    }

    /// Hash a password using Argon2
    fn hash_password(&self, location: &str, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| fault(self.logger.as_ref(), location, format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    fn verify_password(&self, location: &str, user: &UserCredential, password: &str) -> bool {
        match PasswordHash::new(&user.password_hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                self.logger.error(
                    location,
                    &format!("Stored password hash for {} is malformed: {}", user.username, e),
                );
                false
            }
        }
    }
}

fn verify_against_dummy(password: &str) {
    if let Some(parsed) = DUMMY_HASH.as_deref().and_then(|hash| PasswordHash::new(hash).ok()) {
        let _ = Argon2::default().verify_password(password.as_bytes(), &parsed);
    }
}
