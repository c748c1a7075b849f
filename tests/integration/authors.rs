use serde_json::{json, Value};

use crate::common::spawn_app;

#[tokio::test]
async fn test_create_then_get_author() {
    let app = spawn_app().await;

    let response = app
        .post("/api/authors", &json!({ "firstname": "Frank", "lastname": "Herbert" }))
        .await;
    assert_eq!(response.status(), 201);
    let location = response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .expect("No location header");
    let created: Value = response.json().await.unwrap();
    assert_eq!(location, format!("/api/authors/{}", created["id"]));

    let response = app.get(&location).await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["firstname"], "Frank");
    assert_eq!(body["lastname"], "Herbert");
    assert_eq!(body["books"], json!([]));
}

#[tokio::test]
async fn test_list_authors() {
    let app = spawn_app().await;
    app.create_author("Ursula", "Le Guin").await;
    app.create_author("Isaac", "Asimov").await;

    let response = app.get("/api/authors").await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    let authors = body.as_array().expect("Expected an array");
    assert_eq!(authors.len(), 2);
    assert_eq!(authors[0]["lastname"], "Le Guin");
}

#[tokio::test]
async fn test_create_author_requires_names() {
    let app = spawn_app().await;

    let response = app.post("/api/authors", &json!({ "firstname": "" })).await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    let fields: Vec<&str> = body["details"]
        .as_array()
        .expect("Expected field errors")
        .iter()
        .filter_map(|d| d["field"].as_str())
        .collect();
    assert_eq!(fields, vec!["firstname", "lastname"]);
}

#[tokio::test]
async fn test_update_author() {
    let app = spawn_app().await;
    let id = app.create_author("Frank", "Herbert").await;

    let response = app
        .put(
            &format!("/api/authors/{}", id),
            &json!({ "id": id, "firstname": "Frank Patrick", "lastname": "Herbert" }),
        )
        .await;
    assert_eq!(response.status(), 204);

    let body: Value = app
        .get(&format!("/api/authors/{}", id))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["firstname"], "Frank Patrick");
}

#[tokio::test]
async fn test_update_author_id_mismatch() {
    let app = spawn_app().await;
    let id = app.create_author("Frank", "Herbert").await;

    let response = app
        .put(
            &format!("/api/authors/{}", id),
            &json!({ "id": id + 1, "firstname": "Frank", "lastname": "Herbert" }),
        )
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_update_missing_author_is_not_found() {
    let app = spawn_app().await;

    let response = app
        .put(
            "/api/authors/42",
            &json!({ "id": 42, "firstname": "Nobody", "lastname": "Here" }),
        )
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_delete_missing_author_is_not_found() {
    let app = spawn_app().await;

    let response = app.delete("/api/authors/999").await;
    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "NoSuchRecord");
}

#[tokio::test]
async fn test_delete_author_twice() {
    let app = spawn_app().await;
    let id = app.create_author("Frank", "Herbert").await;

    let first = app.delete(&format!("/api/authors/{}", id)).await;
    assert_eq!(first.status(), 204);

    let second = app.delete(&format!("/api/authors/{}", id)).await;
    assert_eq!(second.status(), 404);
}

#[tokio::test]
async fn test_delete_author_keeps_books() {
    let app = spawn_app().await;
    let author_id = app.create_author("Frank", "Herbert").await;
    let book: Value = app
        .post(
            "/api/books",
            &json!({ "title": "Dune", "isbn": "978-0441013593", "author_id": author_id }),
        )
        .await
        .json()
        .await
        .unwrap();

    let response = app.delete(&format!("/api/authors/{}", author_id)).await;
    assert_eq!(response.status(), 204);

    let response = app.get(&format!("/api/books/{}", book["id"])).await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert!(body["author_id"].is_null());
}

#[tokio::test]
async fn test_non_numeric_id_is_not_found() {
    let app = spawn_app().await;

    let response = app.get("/api/authors/abc").await;
    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "NoSuchRecord");

    assert_eq!(app.delete("/api/books/1.5").await.status(), 404);
}

#[tokio::test]
async fn test_create_echoes_padded_names() {
    let app = spawn_app().await;

    let response = app
        .post("/api/authors", &json!({ "firstname": " Frank ", "lastname": "Herbert " }))
        .await;
    assert_eq!(response.status(), 201);
    let created: Value = response.json().await.unwrap();
    assert_eq!(created["firstname"], " Frank ");
    assert_eq!(created["lastname"], "Herbert ");

    let body: Value = app
        .get(&format!("/api/authors/{}", created["id"]))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["firstname"], " Frank ");
}
