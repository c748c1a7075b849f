use std::sync::Arc;

use bookstore_api::{
    api::create_router,
    config::{AppConfig, SeedUser, StorageBackend},
    logging::CapturingLogger,
    repository::Repository,
    AppState,
};
use reqwest::{Client, Response};
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub const JWT_SECRET: &str = "integration-test-secret";
pub const JWT_ISSUER: &str = "http://localhost:8080/";
pub const PASSWORD: &str = "P@ssword1";

pub struct TestApp {
    pub base_url: String,
    pub client: Client,
    pub logger: Arc<CapturingLogger>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send request")
    }

    pub async fn post(&self, path: &str, body: &Value) -> Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send request")
    }

    pub async fn put(&self, path: &str, body: &Value) -> Response {
        self.client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send request")
    }

    pub async fn delete(&self, path: &str) -> Response {
        self.client
            .delete(self.url(path))
            .send()
            .await
            .expect("Failed to send request")
    }

    pub async fn login(&self, username: &str, password: &str) -> Response {
        self.post(
            "/api/users",
            &json!({ "username": username, "password": password }),
        )
        .await
    }

    pub async fn token(&self, username: &str) -> String {
        let body: Value = self
            .login(username, PASSWORD)
            .await
            .json()
            .await
            .expect("Failed to parse login response");
        body["token"].as_str().expect("No token in response").to_string()
    }

    /// Create an author and return its id
    pub async fn create_author(&self, firstname: &str, lastname: &str) -> i64 {
        let response = self
            .post(
                "/api/authors",
                &json!({ "firstname": firstname, "lastname": lastname }),
            )
            .await;
        assert_eq!(response.status(), 201);
        let body: Value = response.json().await.expect("Failed to parse author");
        body["id"].as_i64().expect("No id in author")
    }
}

fn seed_user(username: &str, email: &str, role: &str) -> SeedUser {
    SeedUser {
        username: username.to_string(),
        email: email.to_string(),
        password: PASSWORD.to_string(),
        roles: vec![role.to_string()],
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

pub async fn spawn_app_with(configure: impl FnOnce(&mut AppConfig)) -> TestApp {
    spawn_app_on(Repository::in_memory(), configure).await
}

pub async fn spawn_app_on(repository: Repository, configure: impl FnOnce(&mut AppConfig)) -> TestApp {
    let mut config = AppConfig::default();
    config.database.backend = StorageBackend::Memory;
    config.auth.jwt_secret = JWT_SECRET.to_string();
    config.auth.jwt_issuer = JWT_ISSUER.to_string();
    config.seed.users = vec![
        seed_user("admin", "admin@bookstore.com", "Administrator"),
        seed_user("customer1", "customer1@gmail.com", "Customer"),
    ];
    configure(&mut config);

    let seed_users = config.seed.users.clone();
    let logger = Arc::new(CapturingLogger::new());
    let state = AppState::new(config, repository, logger.clone());
    state
        .services
        .auth
        .seed_users(&seed_users)
        .await
        .expect("Failed to seed users");

    let app = create_router(state);
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server error");
    });

    TestApp {
        base_url: format!("http://{}", addr),
        client: Client::new(),
        logger,
    }
}
