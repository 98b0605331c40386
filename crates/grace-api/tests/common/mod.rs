#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use grace_api::{AppState, AppStateInner, router};
use grace_content::{Guidance, Scripture};
use grace_db::{MemoryStore, Store};

pub const ADMIN_EMAIL: &str = "admin@grace.test";

pub struct TestApp {
    pub state: AppState,
    router: axum::Router,
    _dir: TempDir,
}

/// App over the memory store with no live verse providers and no model.
pub fn app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let state = Arc::new(AppStateInner {
        store: Store::Memory(MemoryStore::new()),
        jwt_secret: "test-secret".into(),
        admin_emails: vec![ADMIN_EMAIL.to_string()],
        scripture: Scripture::new(Vec::new(), Duration::from_millis(200), dir.path().join("verse-cache.json")),
        guidance: Guidance::new(reqwest::Client::new(), None, Duration::from_millis(200)),
    });
    TestApp {
        router: router(state.clone()),
        state,
        _dir: dir,
    }
}

impl TestApp {
    /// Send a request and return (status, JSON body). Empty bodies read as null.
    pub async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let resp = self.router.clone().oneshot(request).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, token, Some(body)).await
    }

    /// Register and return the bearer token.
    pub async fn register(&self, email: &str) -> String {
        let (status, body) = self
            .post(
                "/api/auth/register",
                None,
                json!({ "email": email, "password": "correct horse", "display_name": email.split('@').next().unwrap() }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
        body["token"].as_str().unwrap().to_string()
    }

    pub async fn admin(&self) -> String {
        self.register(ADMIN_EMAIL).await
    }

    /// Create a record through the admin API and return it.
    pub async fn create(&self, admin: &str, collection: &str, body: Value) -> Value {
        let (status, created) = self.post(&format!("/api/admin/{}", collection), Some(admin), body).await;
        assert_eq!(status, StatusCode::CREATED, "create {collection} failed: {created}");
        created
    }
}
