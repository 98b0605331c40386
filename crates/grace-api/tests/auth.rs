mod common;

use axum::http::{Method, StatusCode};
use grace_db::Storage;
use grace_types::models::User;
use serde_json::json;

use common::{ADMIN_EMAIL, app};

#[tokio::test]
async fn register_returns_profile_and_token() {
    let app = app();
    let (status, body) = app
        .post(
            "/api/auth/register",
            None,
            json!({ "email": "  Ruth@Example.com ", "password": "correct horse", "display_name": "Ruth" }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["email"], "ruth@example.com");
    assert_eq!(body["user"]["is_admin"], false);
    assert!(body["user"].get("password_hash").is_none());
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn duplicate_email_is_rejected_once_stored() {
    let app = app();
    app.register("naomi@example.com").await;

    let (status, body) = app
        .post(
            "/api/auth/register",
            None,
            json!({ "email": "NAOMI@example.com", "password": "another pass" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "email already in use");
    assert_eq!(app.state.store.count::<User>().unwrap(), 1);
}

#[tokio::test]
async fn invalid_registration_lists_fields() {
    let app = app();
    let (status, body) = app
        .post("/api/auth/register", None, json!({ "email": "not-an-email", "password": "short" }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_error");
    let fields: Vec<&str> = body["error"]["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"password"));
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let app = app();
    let (status, body) = app.post("/api/auth/login", None, json!({ "email": 42 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn login_checks_password() {
    let app = app();
    app.register("boaz@example.com").await;

    let (status, body) = app
        .post("/api/auth/login", None, json!({ "email": "Boaz@example.com", "password": "correct horse" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "boaz@example.com");

    let (status, body) = app
        .post("/api/auth/login", None, json!({ "email": "boaz@example.com", "password": "wrong horse" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], "invalid credentials");

    let (status, _) = app
        .post("/api/auth/login", None, json!({ "email": "nobody@example.com", "password": "correct horse" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_requires_token() {
    let app = app();
    let token = app.register("orpah@example.com").await;

    let (status, _) = app.get("/api/auth/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.get("/api/auth/me", Some("garbage")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.get("/api/auth/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "orpah@example.com");
}

#[tokio::test]
async fn admin_routes_need_admin_token() {
    let app = app();
    let member = app.register("member@example.com").await;
    let admin = app.admin().await;

    let (status, _) = app.get("/api/admin/stats", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.get("/api/admin/stats", Some(&member)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "forbidden");

    let (status, _) = app
        .post("/api/admin/devotionals", Some(&member), json!({ "title": "x" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.get("/api/admin/stats", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["users"], 2);
}

#[tokio::test]
async fn admin_manages_users() {
    let app = app();
    let admin = app.admin().await;
    app.register("leaving@example.com").await;

    let (_, users) = app.get("/api/admin/users", Some(&admin)).await;
    let users = users.as_array().unwrap().clone();
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|u| u.get("password_hash").is_none()));
    assert!(users.iter().any(|u| u["email"] == ADMIN_EMAIL && u["is_admin"] == true));

    let leaving = users.iter().find(|u| u["email"] == "leaving@example.com").unwrap();
    let uri = format!("/api/admin/users/{}", leaving["id"].as_str().unwrap());
    let (status, body) = app.send(Method::DELETE, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], leaving["id"]);

    let (status, _) = app.send(Method::DELETE, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health() {
    let app = app();
    let (status, body) = app.get("/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
