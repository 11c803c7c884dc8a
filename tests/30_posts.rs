mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{post_body, CONTENT};

#[tokio::test]
async fn author_creates_and_reads_own_posts() -> Result<()> {
    let server = common::spawn_server().await?;
    let ann = server.login("Ann", "ann-secret").await?;

    let res = server.post("/api/posts", &ann, post_body("Hello World")).await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["id"], 1);
    assert_eq!(body["data"]["author"], "Ann");

    let res = server.post("/api/posts", &ann, post_body("Second Thoughts")).await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["id"], 2);

    let res = server.get("/api/posts", &ann).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    let titles: Vec<&str> = body["data"]
        .as_array()
        .map(|posts| posts.iter().filter_map(|p| p["title"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(titles, vec!["Hello World", "Second Thoughts"]);

    let res = server.get("/api/posts/2", &ann).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["title"], "Second Thoughts");
    assert_eq!(body["data"]["content"], CONTENT);
    Ok(())
}

#[tokio::test]
async fn ids_are_scoped_per_author() -> Result<()> {
    let server = common::spawn_server().await?;
    let ann = server.login("Ann", "ann-secret").await?;
    let bob = server.login("Bob", "bob-secret").await?;

    let res = server.post("/api/posts", &ann, post_body("Hello World")).await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    // Same title in another namespace is fine, and numbering starts over
    let res = server.post("/api/posts", &bob, post_body("Hello World")).await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["id"], 1);
    assert_eq!(body["data"]["author"], "Bob");
    Ok(())
}

#[tokio::test]
async fn duplicate_title_conflicts() -> Result<()> {
    let server = common::spawn_server().await?;
    let ann = server.login("Ann", "ann-secret").await?;

    server.post("/api/posts", &ann, post_body("Hello World")).await?;
    let res = server.post("/api/posts", &ann, post_body("Hello World")).await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await?;
    assert_eq!(body["code"], "CONFLICT");
    Ok(())
}

#[tokio::test]
async fn invalid_post_reports_field_error() -> Result<()> {
    let server = common::spawn_server().await?;
    let ann = server.login("Ann", "ann-secret").await?;

    let res = server.post("/api/posts", &ann, post_body("hello world")).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["field_errors"]["title"], "TITLE_CAPITALIZATION_INVALID");

    let res = server
        .post("/api/posts", &ann, json!({ "title": "Short Content", "content": "Too short." }))
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["field_errors"]["content"], "CONTENT_LENGTH_INVALID");

    let res = server.post("/api/posts", &ann, post_body("Buy Now Please")).await?;
    let body: Value = res.json().await?;
    assert_eq!(body["field_errors"]["title"], "TITLE_SPAMMY");
    Ok(())
}

#[tokio::test]
async fn authors_cannot_touch_foreign_posts() -> Result<()> {
    let server = common::spawn_server().await?;
    let ann = server.login("Ann", "ann-secret").await?;
    let bob = server.login("Bob", "bob-secret").await?;

    server.post("/api/posts", &ann, post_body("Hello World")).await?;

    // Writing into someone else's namespace
    let mut body = post_body("Sneaky Post");
    body["author"] = json!("Ann");
    let res = server.post("/api/posts", &bob, body).await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Foreign namespaces look missing on reads
    let res = server.get("/api/posts?author=Ann", &bob).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let res = server.get("/api/posts/1?author=Ann", &bob).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Bob has no posts, so id 1 is simply absent for him
    let res = server.get("/api/posts/1", &bob).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = server.delete("/api/posts/1?author=Ann", &bob).await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let update = json!({ "id": 1, "title": "Taken Over", "content": CONTENT, "author": "Ann" });
    let res = server.put("/api/posts/1", &bob, update).await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Ann's post is untouched
    let res = server.get("/api/posts/1", &ann).await?;
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["title"], "Hello World");
    Ok(())
}

#[tokio::test]
async fn update_replaces_title_and_content() -> Result<()> {
    let server = common::spawn_server().await?;
    let ann = server.login("Ann", "ann-secret").await?;

    server.post("/api/posts", &ann, post_body("Hello World")).await?;

    let update = json!({ "id": 1, "title": "Hello Again", "content": CONTENT });
    let res = server.put("/api/posts/1", &ann, update).await?;
    assert_eq!(res.status(), StatusCode::ACCEPTED);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["id"], 1);
    assert_eq!(body["data"]["title"], "Hello Again");
    assert_eq!(body["data"]["author"], "Ann");

    let res = server.get("/api/posts/1", &ann).await?;
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["title"], "Hello Again");
    Ok(())
}

#[tokio::test]
async fn update_rejects_mismatched_ids() -> Result<()> {
    let server = common::spawn_server().await?;
    let ann = server.login("Ann", "ann-secret").await?;

    server.post("/api/posts", &ann, post_body("Hello World")).await?;

    let update = json!({ "id": 2, "title": "Hello Again", "content": CONTENT });
    let res = server.put("/api/posts/1", &ann, update).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], "mismatching ids in request and url");

    let update = json!({ "id": 1, "title": "Hello Again", "content": CONTENT, "author": "Ann" });
    let res = server.put("/api/posts/1?author=Bob", &ann, update).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn update_of_missing_post_is_not_found() -> Result<()> {
    let server = common::spawn_server().await?;
    let ann = server.login("Ann", "ann-secret").await?;

    // No namespace yet
    let update = json!({ "id": 1, "title": "Hello Again", "content": CONTENT });
    let res = server.put("/api/posts/1", &ann, update).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    server.post("/api/posts", &ann, post_body("Hello World")).await?;
    let update = json!({ "id": 7, "title": "Hello Again", "content": CONTENT });
    let res = server.put("/api/posts/7", &ann, update).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn delete_returns_post_and_ids_are_not_reused() -> Result<()> {
    let server = common::spawn_server().await?;
    let ann = server.login("Ann", "ann-secret").await?;

    server.post("/api/posts", &ann, post_body("Hello World")).await?;
    server.post("/api/posts", &ann, post_body("Second Thoughts")).await?;

    let res = server.delete("/api/posts/2", &ann).await?;
    assert_eq!(res.status(), StatusCode::ACCEPTED);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["title"], "Second Thoughts");

    let res = server.delete("/api/posts/2", &ann).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = server.post("/api/posts", &ann, post_body("Third Time")).await?;
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["id"], 3);
    Ok(())
}

#[tokio::test]
async fn admin_manages_every_namespace() -> Result<()> {
    let server = common::spawn_server().await?;
    let admin = server.login("admin", common::ADMIN_PASSWORD).await?;
    let ann = server.login("Ann", "ann-secret").await?;

    // Empty store lists as empty for admin
    let res = server.get("/api/posts", &admin).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"], json!([]));

    let mut body = post_body("Hello World");
    body["author"] = json!("Bob");
    let res = server.post("/api/posts", &admin, body).await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    server.post("/api/posts", &ann, post_body("Hello World")).await?;

    let res = server.get("/api/posts", &admin).await?;
    let body: Value = res.json().await?;
    let authors: Vec<&str> = body["data"]
        .as_array()
        .map(|posts| posts.iter().filter_map(|p| p["author"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(authors, vec!["Ann", "Bob"]);

    let res = server.get("/api/posts?author=Bob", &admin).await?;
    let body: Value = res.json().await?;
    assert_eq!(body["data"][0]["author"], "Bob");

    // Without an author the first namespace in name order wins
    let res = server.get("/api/posts/1", &admin).await?;
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["author"], "Ann");

    let update = json!({ "id": 1, "title": "Edited By Admin", "content": CONTENT });
    let res = server.put("/api/posts/1?author=Bob", &admin, update).await?;
    assert_eq!(res.status(), StatusCode::ACCEPTED);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["author"], "Bob");
    assert_eq!(body["data"]["title"], "Edited By Admin");

    let res = server.delete("/api/posts/1?author=Bob", &admin).await?;
    assert_eq!(res.status(), StatusCode::ACCEPTED);

    let res = server.get("/api/posts?author=Bob", &admin).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn non_numeric_id_is_bad_request() -> Result<()> {
    let server = common::spawn_server().await?;
    let ann = server.login("Ann", "ann-secret").await?;

    let res = server.get("/api/posts/abc", &ann).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], "invalid post id");
    Ok(())
}

#[tokio::test]
async fn seeded_posts_are_served() -> Result<()> {
    let server = common::spawn_seeded_server().await?;
    let token = server.login("Author 2", "password2").await?;

    let res = server.get("/api/posts", &token).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    let posts = body["data"].as_array().cloned().unwrap_or_default();
    assert_eq!(posts.len(), 2);
    assert!(posts.iter().all(|p| p["author"] == "Author 2"));
    assert_eq!(posts[0]["id"], 1);
    Ok(())
}

#[tokio::test]
async fn create_honours_author_query() -> Result<()> {
    let server = common::spawn_server().await?;
    let admin = server.login("admin", common::ADMIN_PASSWORD).await?;
    let bob = server.login("Bob", "bob-secret").await?;

    let res = server.post("/api/posts?author=Bob", &admin, post_body("Hello World")).await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["author"], "Bob");

    let res = server.post("/api/posts?author=Ann", &bob, post_body("Sneaky Post")).await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let mut body = post_body("Mixed Signals");
    body["author"] = json!("Bob");
    let res = server.post("/api/posts?author=Ann", &admin, body).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], "mismatching authors in request and url");
    Ok(())
}

#[tokio::test]
async fn punctuated_titles_are_accepted() -> Result<()> {
    let server = common::spawn_server().await?;
    let ann = server.login("Ann", "ann-secret").await?;

    for title in ["What Is Rust?", "Hello, World", "Don't Panic"] {
        let res = server.post("/api/posts", &ann, post_body(title)).await?;
        assert_eq!(res.status(), StatusCode::CREATED, "{}", title);
    }
    Ok(())
}
