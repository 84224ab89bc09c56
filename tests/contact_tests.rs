
use portfolio_site::{entities::submission::Submission, errors::DELIVERY_FAILED_MESSAGE};
use reqwest::StatusCode;
use serde_json::{json, Value};
use test_utils::*;

#[actix_rt::test]
async fn valid_submission_is_saved_and_relayed() {
    let app = TestApp::spawn().await;

    let response = app.post_contact(&valid_contact()).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    let id = body["submission_id"].as_str().unwrap().to_string();
    assert!(id.starts_with("contact_"));

    let files = app.stored_submissions();
    assert_eq!(files.len(), 1);
    assert!(files[0].ends_with(format!("{}.json", id)));

    let record: Submission = serde_json::from_slice(&std::fs::read(&files[0]).unwrap()).unwrap();
    assert_eq!(record.id, id);
    assert_eq!(record.email, "ada@example.com");
    assert_eq!(record.source_ip.as_deref(), Some("127.0.0.1"));

    let sent = app.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "Portfolio Contact: Collaboration");
    assert!(sent[0].1.contains("Name: Ada Lovelace"));
    assert!(sent[0].1.contains(&format!("Submission ID: {}", id)));
}

#[actix_rt::test]
async fn first_missing_field_is_reported() {
    let app = TestApp::spawn().await;

    let cases = [
        (json!({}), "Name is required"),
        (json!({ "name": "Ada", "email": "  " }), "Email is required"),
        (
            json!({ "name": "Ada", "email": "ada@example.com", "message": "Hi" }),
            "Subject is required",
        ),
        (
            json!({ "name": "Ada", "email": "ada@example.com", "subject": "Hi", "message": "" }),
            "Message is required",
        ),
    ];

    for (payload, expected) in cases {
        let response = app.post_contact(&payload).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], expected);
    }

    assert!(app.stored_submissions().is_empty());
    assert!(app.notifier.sent().is_empty());
}

#[actix_rt::test]
async fn invalid_email_is_rejected_with_a_reason() {
    let app = TestApp::spawn().await;
    let mut payload = valid_contact();
    payload["email"] = json!("ada@localhost");

    let response = app.post_contact(&payload).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(
        body["message"],
        "The domain name localhost is not valid. It should have a period."
    );
    assert!(app.notifier.sent().is_empty());
}

#[actix_rt::test]
async fn malformed_body_counts_as_an_empty_form() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(app.url("/api/contact"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Name is required");
}

#[actix_rt::test]
async fn delivery_failure_returns_generic_500_but_keeps_the_record() {
    let app = TestApp::spawn_with(|_| {}, TestNotifier::failing()).await;

    let response = app.post_contact(&valid_contact()).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], DELIVERY_FAILED_MESSAGE);
    assert_eq!(app.stored_submissions().len(), 1);
}

#[actix_rt::test]
async fn storage_failure_still_notifies() {
    let app = TestApp::spawn_with(
        |config| {
            let blocker = config.submissions_dir.with_file_name("blocker");
            std::fs::write(&blocker, b"not a directory").unwrap();
            config.submissions_dir = blocker.join("submissions");
        },
        TestNotifier::default(),
    )
    .await;

    let response = app.post_contact(&valid_contact()).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    let id = body["submission_id"].as_str().unwrap();
    assert!(id.trim_start_matches("contact_").chars().all(|c| c.is_ascii_digit()));
    assert_eq!(app.notifier.sent().len(), 1);
}

#[actix_rt::test]
async fn sixth_submission_within_the_hour_is_limited() {
    let app = TestApp::spawn().await;

    for sent in 1..=5u64 {
        let response = app.post_contact(&valid_contact()).await;
        assert_eq!(response.status(), StatusCode::OK);
        let remaining = response.headers()["x-ratelimit-remaining"].to_str().unwrap().to_string();
        assert_eq!(remaining, (5 - sent).to_string());
    }

    let response = app.post_contact(&valid_contact()).await;

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key("retry-after"));
    assert!(!response.headers().contains_key("x-ratelimit-remaining"));
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(app.notifier.sent().len(), 5);
    assert_eq!(app.stored_submissions().len(), 5);
}

#[actix_rt::test]
async fn rejected_submissions_count_against_the_limit() {
    let app = TestApp::spawn().await;

    for _ in 0..5 {
        let response = app.post_contact(&json!({})).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let response = app.post_contact(&valid_contact()).await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(app.notifier.sent().is_empty());
}

#[actix_rt::test]
async fn oversized_message_is_rejected_as_json() {
    let app = TestApp::spawn().await;
    let mut payload = valid_contact();
    payload["message"] = json!("x".repeat(70 * 1024));

    let response = app.post_contact(&payload).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Your message is too long. Please keep it under 64 KiB.");
    assert!(app.stored_submissions().is_empty());
    assert!(app.notifier.sent().is_empty());
}

#[actix_rt::test]
async fn long_message_under_the_limit_is_accepted() {
    let app = TestApp::spawn().await;
    let mut payload = valid_contact();
    payload["message"] = json!("x".repeat(60 * 1024));

    let response = app.post_contact(&payload).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.notifier.sent().len(), 1);
}
