mod common;

use axum::http::StatusCode;
use common::{TestApp, assert_error, body_json};
use std::time::Duration;

async fn create_group(app: &TestApp, cookie: &str, name: &str) -> String {
    let resp = app
        .post_json(
            "/api/chat/groups",
            &serde_json::json!({ "name": name }),
            Some(cookie),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    body_json(resp).await["id"].as_str().unwrap().to_string()
}

async fn send(app: &TestApp, cookie: &str, body: serde_json::Value) -> axum::response::Response {
    app.post_json("/api/chat/messages", &body, Some(cookie)).await
}

#[tokio::test]
async fn message_endpoints_require_session() {
    let app = TestApp::new().await;

    let resp = app
        .post_json(
            "/api/chat/messages",
            &serde_json::json!({ "content": "hi" }),
            None,
        )
        .await;
    assert_error(resp, StatusCode::UNAUTHORIZED).await;

    let resp = app.get("/api/chat/messages?group_id=g", None).await;
    assert_error(resp, StatusCode::UNAUTHORIZED).await;
}

#[tokio::test]
async fn send_requires_exactly_one_target() {
    let app = TestApp::new().await;
    let (_ada_id, ada) = app.signup("Ada", "ada@example.com").await;
    let (bob_id, _bob) = app.signup("Bob", "bob@example.com").await;
    let group_id = create_group(&app, &ada, "Rustaceans").await;

    // No target at all
    let resp = send(&app, &ada, serde_json::json!({ "content": "hi" })).await;
    assert_error(resp, StatusCode::BAD_REQUEST).await;

    // Both targets at once
    let resp = send(
        &app,
        &ada,
        serde_json::json!({ "content": "hi", "group_id": group_id, "recipient_id": bob_id }),
    )
    .await;
    assert_error(resp, StatusCode::BAD_REQUEST).await;
}

#[tokio::test]
async fn send_requires_content() {
    let app = TestApp::new().await;
    let (_ada_id, ada) = app.signup("Ada", "ada@example.com").await;
    let group_id = create_group(&app, &ada, "Rustaceans").await;

    let resp = send(
        &app,
        &ada,
        serde_json::json!({ "content": "   ", "group_id": group_id }),
    )
    .await;
    assert_error(resp, StatusCode::BAD_REQUEST).await;
}

#[tokio::test]
async fn get_requires_a_target_filter() {
    let app = TestApp::new().await;
    let (_ada_id, ada) = app.signup("Ada", "ada@example.com").await;

    let resp = app.get("/api/chat/messages", Some(&ada)).await;
    assert_error(resp, StatusCode::BAD_REQUEST).await;
}

#[tokio::test]
async fn group_messages_come_back_newest_first_with_limit() {
    let app = TestApp::new().await;
    let (_ada_id, ada) = app.signup("Ada", "ada@example.com").await;
    let group_id = create_group(&app, &ada, "Rustaceans").await;

    for content in ["first", "second", "third"] {
        let resp = send(
            &app,
            &ada,
            serde_json::json!({ "content": content, "group_id": group_id }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        // Distinct creation timestamps keep the ordering unambiguous
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let resp = app
        .get(
            &format!("/api/chat/messages?group_id={group_id}&limit=2"),
            Some(&ada),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let messages = body_json(resp).await;
    let messages = messages.as_array().unwrap().clone();

    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["content"], "third");
    assert_eq!(messages[1]["content"], "second");
    assert!(
        messages[0]["created_at"].as_str().unwrap()
            >= messages[1]["created_at"].as_str().unwrap()
    );
}

#[tokio::test]
async fn message_limit_is_clamped_to_at_least_one() {
    let app = TestApp::new().await;
    let (_ada_id, ada) = app.signup("Ada", "ada@example.com").await;
    let group_id = create_group(&app, &ada, "Rustaceans").await;

    for content in ["first", "second"] {
        let resp = send(
            &app,
            &ada,
            serde_json::json!({ "content": content, "group_id": group_id }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    // limit=0 cannot be used to suppress results entirely
    let resp = app
        .get(
            &format!("/api/chat/messages?group_id={group_id}&limit=0"),
            Some(&ada),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let messages = body_json(resp).await;
    assert_eq!(messages.as_array().unwrap().len(), 1);
    assert_eq!(messages[0]["content"], "second");
}

#[tokio::test]
async fn group_message_carries_sender_display_fields() {
    let app = TestApp::new().await;
    let (ada_id, ada) = app.signup("Ada", "ada@example.com").await;
    let group_id = create_group(&app, &ada, "Rustaceans").await;

    let resp = send(
        &app,
        &ada,
        serde_json::json!({ "content": "hello", "group_id": group_id }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .get(&format!("/api/chat/messages?group_id={group_id}"), Some(&ada))
        .await;
    let messages = body_json(resp).await;
    let message = &messages.as_array().unwrap()[0];
    assert_eq!(message["sender_id"], ada_id.as_str());
    assert_eq!(message["sender_first_name"], "Ada");
    assert_eq!(message["message_type"], "text");
    assert_eq!(message["is_read"], false);
}

#[tokio::test]
async fn direct_message_roundtrip() {
    let app = TestApp::new().await;
    let (_ada_id, ada) = app.signup("Ada", "ada@example.com").await;
    let (bob_id, bob) = app.signup("Bob", "bob@example.com").await;

    let resp = send(
        &app,
        &ada,
        serde_json::json!({ "content": "psst", "recipient_id": bob_id }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .get(
            &format!("/api/chat/messages?recipient_id={bob_id}"),
            Some(&bob),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let messages = body_json(resp).await;
    let messages = messages.as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["content"], "psst");
    assert_eq!(messages[0]["sender_first_name"], "Ada");
}

#[tokio::test]
async fn non_members_cannot_post_to_a_group() {
    let app = TestApp::new().await;
    let (_ada_id, ada) = app.signup("Ada", "ada@example.com").await;
    let (_bob_id, bob) = app.signup("Bob", "bob@example.com").await;
    let group_id = create_group(&app, &ada, "Rustaceans").await;

    let resp = send(
        &app,
        &bob,
        serde_json::json!({ "content": "let me in", "group_id": group_id }),
    )
    .await;
    assert_error(resp, StatusCode::FORBIDDEN).await;
}

#[tokio::test]
async fn non_members_cannot_read_group_messages() {
    let app = TestApp::new().await;
    let (_ada_id, ada) = app.signup("Ada", "ada@example.com").await;
    let (_bob_id, bob) = app.signup("Bob", "bob@example.com").await;
    let group_id = create_group(&app, &ada, "Rustaceans").await;

    let resp = app
        .get(&format!("/api/chat/messages?group_id={group_id}"), Some(&bob))
        .await;
    assert_error(resp, StatusCode::FORBIDDEN).await;
}

#[tokio::test]
async fn online_status_updates_are_visible_to_others() {
    let app = TestApp::new().await;
    let (ada_id, ada) = app.signup("Ada", "ada@example.com").await;
    let (_bob_id, bob) = app.signup("Bob", "bob@example.com").await;

    let resp = app
        .post_json(
            "/api/chat/online-status",
            &serde_json::json!({ "is_online": true }),
            Some(&ada),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app.get("/api/chat/users", Some(&bob)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let users = body_json(resp).await;
    let ada_entry = users
        .as_array()
        .unwrap()
        .iter()
        .find(|u| u["id"] == ada_id.as_str())
        .expect("Ada should be discoverable to Bob");
    assert_eq!(ada_entry["is_online"], true);

    // The listing never exposes credentials
    assert!(ada_entry.get("password_hash").is_none());
}

#[tokio::test]
async fn online_status_requires_flag() {
    let app = TestApp::new().await;
    let (_ada_id, ada) = app.signup("Ada", "ada@example.com").await;

    let resp = app
        .post_json("/api/chat/online-status", &serde_json::json!({}), Some(&ada))
        .await;
    assert_error(resp, StatusCode::BAD_REQUEST).await;
}

#[tokio::test]
async fn user_listing_excludes_the_caller() {
    let app = TestApp::new().await;
    let (ada_id, ada) = app.signup("Ada", "ada@example.com").await;
    let (bob_id, _bob) = app.signup("Bob", "bob@example.com").await;

    let resp = app.get("/api/chat/users", Some(&ada)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let users = body_json(resp).await;
    let ids: Vec<_> = users
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["id"].as_str().unwrap().to_string())
        .collect();
    assert!(ids.contains(&bob_id));
    assert!(!ids.contains(&ada_id));
}
