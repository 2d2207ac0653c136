mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn list(server: &common::TestServer, token: &str, query: &str) -> Result<Vec<Value>> {
    let res = server
        .client
        .get(server.url(&format!("/api/todos{}", query)))
        .bearer_auth(token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(res.json().await?)
}

#[tokio::test]
async fn create_returns_camel_case_todo() -> Result<()> {
    let server = common::spawn_server().await?;
    let token = server.register("a@example.com").await?;

    let todo = server.create_todo(&token, "  Buy milk  ").await?;
    assert_eq!(todo["text"], "Buy milk");
    assert_eq!(todo["completed"], false);
    assert!(todo["id"].is_i64());
    assert!(todo["userId"].is_i64());
    assert!(todo["createdAt"].is_string());
    assert!(todo["updatedAt"].is_string());
    Ok(())
}

#[tokio::test]
async fn list_is_newest_first() -> Result<()> {
    let server = common::spawn_server().await?;
    let token = server.register("a@example.com").await?;

    server.create_todo(&token, "first").await?;
    server.create_todo(&token, "second").await?;
    server.create_todo(&token, "third").await?;

    let texts: Vec<String> = list(&server, &token, "")
        .await?
        .iter()
        .map(|t| t["text"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(texts, vec!["third", "second", "first"]);
    Ok(())
}

#[tokio::test]
async fn filters_by_completion_state() -> Result<()> {
    let server = common::spawn_server().await?;
    let token = server.register("a@example.com").await?;

    let done = server.create_todo(&token, "done").await?;
    server.create_todo(&token, "open").await?;

    let res = server
        .client
        .patch(server.url(&format!("/api/todos/{}", done["id"])))
        .bearer_auth(&token)
        .json(&json!({ "completed": true }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let active = list(&server, &token, "?filter=active").await?;
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["text"], "open");

    let completed = list(&server, &token, "?filter=completed").await?;
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0]["text"], "done");

    assert_eq!(list(&server, &token, "?filter=all").await?.len(), 2);
    // unrecognised values fall back to everything
    assert_eq!(list(&server, &token, "?filter=someday").await?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn patch_updates_only_given_fields() -> Result<()> {
    let server = common::spawn_server().await?;
    let token = server.register("a@example.com").await?;
    let todo = server.create_todo(&token, "draft").await?;
    let url = server.url(&format!("/api/todos/{}", todo["id"]));

    let res = server
        .client
        .patch(&url)
        .bearer_auth(&token)
        .json(&json!({ "text": " final " }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = res.json().await?;
    assert_eq!(updated["text"], "final");
    assert_eq!(updated["completed"], false);
    assert_eq!(updated["createdAt"], todo["createdAt"]);

    let res = server
        .client
        .patch(&url)
        .bearer_auth(&token)
        .json(&json!({ "completed": true }))
        .send()
        .await?;
    let updated: Value = res.json().await?;
    assert_eq!(updated["text"], "final");
    assert_eq!(updated["completed"], true);
    Ok(())
}

#[tokio::test]
async fn text_rules_apply_on_create_and_update() -> Result<()> {
    let server = common::spawn_server().await?;
    let token = server.register("a@example.com").await?;

    let res = server
        .client
        .post(server.url("/api/todos"))
        .bearer_auth(&token)
        .json(&json!({ "text": "   " }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["details"][0]["field"], "text");

    let res = server
        .client
        .post(server.url("/api/todos"))
        .bearer_auth(&token)
        .json(&json!({ "text": "x".repeat(501) }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let at_limit = server.create_todo(&token, &"y".repeat(500)).await?;
    assert_eq!(at_limit["text"].as_str().unwrap().chars().count(), 500);

    let res = server
        .client
        .patch(server.url(&format!("/api/todos/{}", at_limit["id"])))
        .bearer_auth(&token)
        .json(&json!({ "text": "" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn non_integer_id_is_a_validation_error() -> Result<()> {
    let server = common::spawn_server().await?;
    let token = server.register("a@example.com").await?;

    let res = server
        .client
        .delete(server.url("/api/todos/abc"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = res.json().await?;
    assert_eq!(body["details"][0]["field"], "id");
    assert_eq!(body["details"][0]["message"], "Invalid todo ID");
    Ok(())
}

#[tokio::test]
async fn delete_then_missing() -> Result<()> {
    let server = common::spawn_server().await?;
    let token = server.register("a@example.com").await?;
    let todo = server.create_todo(&token, "temp").await?;
    let url = server.url(&format!("/api/todos/{}", todo["id"]));

    let res = server.client.delete(&url).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Todo deleted successfully");

    let res = server.client.delete(&url).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], "Todo not found");

    assert!(list(&server, &token, "").await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn users_cannot_see_or_touch_each_others_todos() -> Result<()> {
    let server = common::spawn_server().await?;
    let alice = server.register("alice@example.com").await?;
    let bob = server.register("bob@example.com").await?;

    let todo = server.create_todo(&alice, "alice's secret").await?;
    let url = server.url(&format!("/api/todos/{}", todo["id"]));

    assert!(list(&server, &bob, "").await?.is_empty());

    let res = server
        .client
        .patch(&url)
        .bearer_auth(&bob)
        .json(&json!({ "completed": true }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], "Todo not found");

    let res = server.client.delete(&url).bearer_auth(&bob).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let remaining = list(&server, &alice, "").await?;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["completed"], false);
    Ok(())
}

#[tokio::test]
async fn owner_comes_from_token_not_body() -> Result<()> {
    let server = common::spawn_server().await?;
    let alice = server.register("alice@example.com").await?;
    let bob = server.register("bob@example.com").await?;

    let res = server
        .client
        .post(server.url("/api/todos"))
        .bearer_auth(&alice)
        .json(&json!({ "text": "mine", "userId": 999 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let todo: Value = res.json().await?;
    assert_ne!(todo["userId"], 999);

    assert!(list(&server, &bob, "").await?.is_empty());
    Ok(())
}
