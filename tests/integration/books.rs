use serde_json::{json, Value};

use crate::common::spawn_app;

fn dune(author_id: i64) -> Value {
    json!({
        "title": "Dune",
        "year": 1965,
        "isbn": "978-0441013593",
        "summary": "Desert planet politics.",
        "image": "/img/dune.jpg",
        "author_id": author_id
    })
}

#[tokio::test]
async fn test_create_then_get_book() {
    let app = spawn_app().await;
    let author_id = app.create_author("Frank", "Herbert").await;

    let response = app.post("/api/books", &dune(author_id)).await;
    assert_eq!(response.status(), 201);
    let created: Value = response.json().await.unwrap();
    assert_eq!(created["author"]["lastname"], "Herbert");

    let response = app.get(&format!("/api/books/{}", created["id"])).await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["title"], "Dune");
    assert_eq!(body["year"], 1965);
    assert_eq!(body["author_id"], author_id);
    assert_eq!(body["author"]["firstname"], "Frank");
}

#[tokio::test]
async fn test_list_books_embeds_authors() {
    let app = spawn_app().await;
    let author_id = app.create_author("Frank", "Herbert").await;
    app.post("/api/books", &dune(author_id)).await;
    app.post(
        "/api/books",
        &json!({ "title": "Anonymous Tales", "isbn": "0000000000" }),
    )
    .await;

    let body: Value = app.get("/api/books").await.json().await.unwrap();
    let books = body.as_array().expect("Expected an array");
    assert_eq!(books.len(), 2);
    assert_eq!(books[0]["author"]["lastname"], "Herbert");
    assert!(books[1]["author"].is_null());
}

#[tokio::test]
async fn test_author_lists_their_books() {
    let app = spawn_app().await;
    let author_id = app.create_author("Frank", "Herbert").await;
    app.post("/api/books", &dune(author_id)).await;

    let body: Value = app
        .get(&format!("/api/authors/{}", author_id))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["books"][0]["title"], "Dune");
}

#[tokio::test]
async fn test_create_book_with_unknown_author() {
    let app = spawn_app().await;

    let response = app.post("/api/books", &dune(77)).await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["details"][0]["field"], "author_id");
    assert_eq!(body["details"][0]["code"], "unknown_author");
}

#[tokio::test]
async fn test_create_book_validation() {
    let app = spawn_app().await;

    let response = app
        .post("/api/books", &json!({ "title": "", "year": 0 }))
        .await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    let fields: Vec<&str> = body["details"]
        .as_array()
        .expect("Expected field errors")
        .iter()
        .filter_map(|d| d["field"].as_str())
        .collect();
    assert!(fields.contains(&"title"));
    assert!(fields.contains(&"isbn"));
    assert!(fields.contains(&"year"));
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = spawn_app().await;

    let response = app
        .client
        .post(app.url("/api/books"))
        .header("content-type", "application/json")
        .body("{\"title\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "BadValue");
}

#[tokio::test]
async fn test_missing_body_is_bad_request() {
    let app = spawn_app().await;

    let response = app.client.post(app.url("/api/books")).send().await.unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_update_book_id_mismatch() {
    let app = spawn_app().await;

    let response = app
        .put(
            "/api/books/5",
            &json!({ "id": 6, "title": "Dune", "isbn": "978-0441013593" }),
        )
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_update_book() {
    let app = spawn_app().await;
    let author_id = app.create_author("Frank", "Herbert").await;
    let created: Value = app
        .post("/api/books", &dune(author_id))
        .await
        .json()
        .await
        .unwrap();
    let id = created["id"].as_i64().unwrap();

    let response = app
        .put(
            &format!("/api/books/{}", id),
            &json!({ "id": id, "title": "Dune Messiah", "year": 1969, "isbn": "978-0593098233", "author_id": author_id }),
        )
        .await;
    assert_eq!(response.status(), 204);

    let body: Value = app
        .get(&format!("/api/books/{}", id))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["title"], "Dune Messiah");
    assert_eq!(body["year"], 1969);
    assert!(body["summary"].is_null());
}

#[tokio::test]
async fn test_update_missing_book_is_not_found() {
    let app = spawn_app().await;

    let response = app
        .put(
            "/api/books/3",
            &json!({ "id": 3, "title": "Ghost", "isbn": "123" }),
        )
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_delete_book_twice() {
    let app = spawn_app().await;
    let created: Value = app
        .post("/api/books", &json!({ "title": "Dune", "isbn": "978-0441013593" }))
        .await
        .json()
        .await
        .unwrap();
    let path = format!("/api/books/{}", created["id"]);

    assert_eq!(app.delete(&path).await.status(), 204);
    assert_eq!(app.delete(&path).await.status(), 404);
    assert_eq!(app.get(&path).await.status(), 404);
}

#[tokio::test]
async fn test_create_book_echoes_fields() {
    let app = spawn_app().await;

    let response = app
        .post("/api/books", &json!({ "title": "Dune", "isbn": "123", "year": 1965 }))
        .await;
    assert_eq!(response.status(), 201);
    let created: Value = response.json().await.unwrap();
    assert_eq!(created["title"], "Dune");
    assert_eq!(created["isbn"], "123");
    assert_eq!(created["year"], 1965);
    assert!(created["id"].as_i64().unwrap() >= 1);

    let response = app.get(&format!("/api/books/{}", created["id"])).await;
    assert_eq!(response.status(), 200);
}
