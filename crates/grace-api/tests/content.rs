mod common;

use axum::http::{Method, StatusCode};
use serde_json::{Value, json};

use common::app;

fn devotional(title: &str, date: &str) -> Value {
    json!({
        "title": title,
        "content": "His mercies are new every morning.",
        "verse_text": "It is of the LORD's mercies that we are not consumed",
        "verse_reference": "Lamentations 3:22",
        "publish_date": date
    })
}

#[tokio::test]
async fn deleted_devotional_disappears() {
    let app = app();
    let admin = app.admin().await;
    let kept = app.create(&admin, "devotionals", devotional("Kept", "2026-01-01")).await;
    let doomed = app.create(&admin, "devotionals", devotional("Doomed", "2026-01-02")).await;
    assert_eq!(doomed["author"], "Daily Grace");

    let (_, list) = app.get("/api/devotionals", None).await;
    assert_eq!(list.as_array().unwrap().len(), 2);

    let id = doomed["id"].as_str().unwrap();
    let (status, _) = app
        .send(Method::DELETE, &format!("/api/admin/devotionals/{}", id), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, list) = app.get("/api/devotionals", None).await;
    let ids: Vec<&str> = list.as_array().unwrap().iter().map(|d| d["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec![kept["id"].as_str().unwrap()]);

    let (status, body) = app.get(&format!("/api/devotionals/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "devotional not found");
}

#[tokio::test]
async fn admin_update_replaces_fields() {
    let app = app();
    let admin = app.admin().await;
    let created = app.create(&admin, "devotionals", devotional("Draft", "2026-01-01")).await;
    let uri = format!("/api/admin/devotionals/{}", created["id"].as_str().unwrap());

    let mut edited = devotional("Final", "2026-01-03");
    edited["is_active"] = json!(false);
    let (status, body) = app.send(Method::PUT, &uri, Some(&admin), Some(edited)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Final");
    assert_eq!(body["id"], created["id"]);
    assert_eq!(body["created_at"], created["created_at"]);

    // Inactive devotionals drop off the public list but stay in the admin one.
    let (_, public) = app.get("/api/devotionals", None).await;
    assert!(public.as_array().unwrap().is_empty());
    let (_, all) = app.get("/api/admin/devotionals", Some(&admin)).await;
    assert_eq!(all.as_array().unwrap().len(), 1);

    let (status, body) = app
        .send(Method::PUT, &uri, Some(&admin), Some(json!({ "title": "", "content": "x", "verse_text": "x", "verse_reference": "x", "publish_date": "2026-01-03" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["details"][0]["field"], "title");
}

#[tokio::test]
async fn todays_devotional_falls_back_to_latest_past() {
    let app = app();
    let (status, _) = app.get("/api/devotionals/today", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let admin = app.admin().await;
    app.create(&admin, "devotionals", devotional("Old", "2025-06-01")).await;
    app.create(&admin, "devotionals", devotional("Newer", "2026-01-01")).await;
    app.create(&admin, "devotionals", devotional("Future", "2999-01-01")).await;

    let (status, body) = app.get("/api/devotionals/today", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Newer");
}

#[tokio::test]
async fn prayer_stats_match_submissions() {
    let app = app();
    for (content, category) in [("Healing for my mother", "health"), ("A new job", "work"), ("Peace at home", "family"), ("Strength", "health")] {
        let (status, _) = app
            .post("/api/prayers", None, json!({ "content": content, "category": category }))
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, stats) = app.get("/api/prayers/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total"], 4);
    assert_eq!(stats["answered"], 0);
    assert_eq!(stats["by_category"]["health"], 2);

    let (_, list) = app.get("/api/prayers", None).await;
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 4);
    // Newest first.
    assert_eq!(list[0]["content"], "Strength");
}

#[tokio::test]
async fn anonymous_prayers_hide_their_author() {
    let app = app();
    let token = app.register("hannah@example.com").await;
    let (status, prayer) = app
        .post(
            "/api/prayers",
            Some(&token),
            json!({ "name": "Hannah", "content": "For a child", "is_anonymous": true, "is_answered": true }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(prayer["name"], Value::Null);
    assert_eq!(prayer["user_id"], Value::Null);
    assert_eq!(prayer["is_answered"], false);

    let (status, prayed) = app
        .post(&format!("/api/prayers/{}/pray", prayer["id"].as_str().unwrap()), None, json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(prayed["prayer_count"], 1);
    assert_eq!(prayed["name"], Value::Null);

    let (_, stats) = app.get("/api/prayers/stats", None).await;
    assert_eq!(stats["prayers_offered"], 1);

    let (status, _) = app.post("/api/prayers/missing/pray", None, json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn verses_work_without_providers() {
    let app = app();

    let (status, random) = app.get("/api/verses/random", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(random["source"], "static");
    assert!(!random["text"].as_str().unwrap().is_empty());

    let (_, themed) = app.get("/api/verses/random?theme=hope", None).await;
    assert_eq!(themed["theme"], "hope");

    let (_, first) = app.get("/api/verses/daily", None).await;
    let (_, second) = app.get("/api/verses/daily", None).await;
    assert_eq!(first, second);

    let (_, themes) = app.get("/api/verses/themes", None).await;
    assert!(themes.as_array().unwrap().iter().any(|t| t == "peace"));
}

#[tokio::test]
async fn guidance_answers_from_templates() {
    let app = app();
    let (status, body) = app
        .post("/api/guidance", None, json!({ "message": "I feel so alone lately" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["emotion"], "lonely");
    assert_eq!(body["source"], "template");
    assert_eq!(body["verse"]["theme"], "love");

    let (status, _) = app.post("/api/guidance", None, json!({ "message": "   " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn certificates_can_be_verified() {
    let app = app();
    let admin = app.admin().await;
    let (status, contributor) = app
        .post(
            "/api/contributors",
            None,
            json!({ "name": "Lydia", "email": "lydia@example.com", "contribution_type": "donor", "amount_cents": 2500 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, wall) = app.get("/api/contributors", None).await;
    assert_eq!(wall[0]["name"], "Lydia");
    assert_eq!(wall[0]["email"], Value::Null);

    let issue_uri = format!("/api/admin/contributors/{}/certificate", contributor["id"].as_str().unwrap());
    let (status, body) = app.post(&issue_uri, Some(&admin), json!({ "template": "diploma" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"].as_str().unwrap().contains("diploma"));

    let (status, cert) = app.post(&issue_uri, Some(&admin), json!({ "template": "blessing" })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(cert["body"].as_str().unwrap().contains("Presented to Lydia"));

    let code = cert["verification_code"].as_str().unwrap().to_lowercase();
    let (_, verified) = app.get(&format!("/api/certificates/verify/{}", code), None).await;
    assert_eq!(verified["valid"], true);
    assert_eq!(verified["certificate"]["id"], cert["id"]);

    let (_, fetched) = app.get(&format!("/api/certificates/{}", cert["id"].as_str().unwrap()), None).await;
    assert_eq!(fetched["verification_code"], cert["verification_code"]);

    let (_, bogus) = app.get("/api/certificates/verify/000000000000", None).await;
    assert_eq!(bogus["valid"], false);

    let (status, _) = app
        .post("/api/admin/contributors/missing/certificate", Some(&admin), json!({ "template": "gratitude" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn library_lists_active_items() {
    let app = app();
    let admin = app.admin().await;
    app.create(
        &admin,
        "ebooks",
        json!({ "title": "Psalms for Rest", "author": "D. Grace", "download_url": "https://example.com/rest.pdf", "category": "devotional" }),
    )
    .await;
    app.create(
        &admin,
        "ebooks",
        json!({ "title": "Draft", "author": "D. Grace", "download_url": "/files/draft.pdf", "is_active": false }),
    )
    .await;
    app.create(&admin, "sponsors", json!({ "name": "Mustard Seed Co", "tier": "gold", "website": "https://seed.example" }))
        .await;

    let (_, ebooks) = app.get("/api/ebooks", None).await;
    assert_eq!(ebooks.as_array().unwrap().len(), 1);
    let (_, filtered) = app.get("/api/ebooks?category=Devotional", None).await;
    assert_eq!(filtered.as_array().unwrap().len(), 1);
    let (_, none) = app.get("/api/ebooks?category=history", None).await;
    assert!(none.as_array().unwrap().is_empty());

    let (_, sponsors) = app.get("/api/sponsors", None).await;
    assert_eq!(sponsors[0]["tier"], "gold");

    let (status, body) = app.post("/api/admin/sponsors", Some(&admin), json!({ "name": "Bad", "website": "ftp://nope" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["details"][0]["field"], "website");
}

#[tokio::test]
async fn support_reply_answers_request() {
    let app = app();
    let (status, request) = app
        .post(
            "/api/support",
            None,
            json!({ "name": "Elijah", "topic": "grief", "message": "I lost my father.", "is_anonymous": true }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(request["status"], "open");
    assert_eq!(request["name"], Value::Null);
    let id = request["id"].as_str().unwrap();

    let (status, reply) = app
        .post(&format!("/api/support/{}/replies", id), None, json!({ "message": "Praying for you." }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(reply["author_name"], "A friend");

    let (_, thread) = app.get(&format!("/api/support/{}", id), None).await;
    assert_eq!(thread["request"]["status"], "answered");
    assert_eq!(thread["replies"].as_array().unwrap().len(), 1);

    let (status, _) = app
        .post("/api/support/missing/replies", None, json!({ "message": "hello" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn notifications_are_scoped_to_their_user() {
    let app = app();
    let admin = app.admin().await;
    let alice = app.register("alice@example.com").await;
    let bob = app.register("bob@example.com").await;
    let (_, me) = app.get("/api/auth/me", Some(&alice)).await;

    let broadcast = app
        .create(&admin, "notifications", json!({ "title": "Welcome", "message": "Hello all" }))
        .await;
    let personal = app
        .create(
            &admin,
            "notifications",
            json!({ "title": "For Alice", "message": "Hi", "user_id": me["id"], "kind": "challenge" }),
        )
        .await;

    let (_, alice_list) = app.get("/api/notifications", Some(&alice)).await;
    assert_eq!(alice_list.as_array().unwrap().len(), 2);
    assert_eq!(alice_list[0]["title"], "For Alice");
    let (_, bob_list) = app.get("/api/notifications", Some(&bob)).await;
    assert_eq!(bob_list.as_array().unwrap().len(), 1);

    let read_uri = format!("/api/notifications/{}/read", personal["id"].as_str().unwrap());
    let (status, _) = app.send(Method::PATCH, &read_uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, read) = app.send(Method::PATCH, &read_uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(read["is_read"], true);

    let (status, _) = app
        .send(
            Method::PATCH,
            &format!("/api/notifications/{}/read", broadcast["id"].as_str().unwrap()),
            Some(&alice),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
