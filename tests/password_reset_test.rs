mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use jobportal_service::services::{AccountStore, RecoveryTokenService};
use jobportal_service::utils::{verify_password, Password, PasswordHashString};
use serde_json::json;

use common::TestApp;

/// Pull the raw token out of the reset link in a captured email.
fn extract_token(body: &str) -> String {
    let start = body
        .find("token=")
        .expect("No reset link in email body")
        + "token=".len();
    body[start..]
        .chars()
        .take_while(|c| c.is_ascii_hexdigit())
        .collect()
}

#[tokio::test]
async fn reset_request_for_unknown_email_returns_200_without_sending() {
    let app = TestApp::spawn();

    let (status, body) = app
        .post_json(
            "/api/v1/auth/password-reset/request",
            json!({"email": "nobody@example.com"}),
        )
        .await;

    // Anti-enumeration: same answer as for a registered address.
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(app.relay.send_count(), 0);
}

#[tokio::test]
async fn reset_request_sends_link_and_stores_only_the_digest() {
    let app = TestApp::spawn();
    let account = app.seed_account("applicant@example.com", "originalPass1").await;

    let (status, body) = app
        .post_json(
            "/api/v1/auth/password-reset/request",
            json!({"email": "applicant@example.com"}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));

    let sent = app.relay.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "applicant@example.com");
    assert_eq!(sent[0].subject, "Reset Your Password");

    let raw = extract_token(sent[0].text_body.as_deref().unwrap());
    assert_eq!(raw.len(), 64); // 32 random bytes, hex encoded

    let stored = app
        .store
        .find_by_id(account.account_id)
        .await
        .unwrap()
        .unwrap();
    let stored_hash = stored.reset_token_hash.unwrap();
    assert_ne!(stored_hash, raw);
    assert_eq!(stored_hash, RecoveryTokenService::digest(&raw));
}

#[tokio::test]
async fn valid_token_resets_password_and_clears_token() {
    let app = TestApp::spawn();
    let account = app.seed_account("applicant@example.com", "originalPass1").await;

    app.post_json(
        "/api/v1/auth/password-reset/request",
        json!({"email": "applicant@example.com"}),
    )
    .await;
    let raw = extract_token(app.relay.sent()[0].text_body.as_deref().unwrap());

    let (status, body) = app
        .post_json(
            "/api/v1/auth/password-reset/confirm",
            json!({"token": raw, "password": "brandNewPass1"}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Password reset Successfully"));

    let stored = app
        .store
        .find_by_id(account.account_id)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.reset_token_hash.is_none());
    assert!(stored.reset_token_expiry.is_none());
    verify_password(
        &Password::new("brandNewPass1".to_string()),
        &PasswordHashString::new(stored.password_hash),
    )
    .expect("New password should verify against stored hash");
}

#[tokio::test]
async fn unknown_token_is_rejected_and_credential_is_untouched() {
    let app = TestApp::spawn();
    let account = app.seed_account("applicant@example.com", "originalPass1").await;

    let (status, body) = app
        .post_json(
            "/api/v1/auth/password-reset/confirm",
            json!({"token": "deadbeef".repeat(8), "password": "brandNewPass1"}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Invalid Token"));

    let stored = app
        .store
        .find_by_id(account.account_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.password_hash, account.password_hash);
}

#[tokio::test]
async fn token_is_single_use() {
    let app = TestApp::spawn();
    app.seed_account("applicant@example.com", "originalPass1").await;

    app.post_json(
        "/api/v1/auth/password-reset/request",
        json!({"email": "applicant@example.com"}),
    )
    .await;
    let raw = extract_token(app.relay.sent()[0].text_body.as_deref().unwrap());

    let (first, _) = app
        .post_json(
            "/api/v1/auth/password-reset/confirm",
            json!({"token": raw, "password": "brandNewPass1"}),
        )
        .await;
    assert_eq!(first, StatusCode::OK);

    let (replay, body) = app
        .post_json(
            "/api/v1/auth/password-reset/confirm",
            json!({"token": raw, "password": "anotherNewPass1"}),
        )
        .await;
    assert_eq!(replay, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("Invalid Token"));
}

#[tokio::test]
async fn expired_token_is_indistinguishable_from_unknown() {
    let app = TestApp::spawn();
    let account = app.seed_account("applicant@example.com", "originalPass1").await;

    // Plant a token that expired a minute ago.
    let raw = "ab".repeat(32);
    app.store
        .set_reset_token(
            account.account_id,
            &RecoveryTokenService::digest(&raw),
            Utc::now() - Duration::minutes(1),
        )
        .await
        .unwrap();

    let (expired_status, expired_body) = app
        .post_json(
            "/api/v1/auth/password-reset/confirm",
            json!({"token": raw, "password": "brandNewPass1"}),
        )
        .await;
    let (unknown_status, unknown_body) = app
        .post_json(
            "/api/v1/auth/password-reset/confirm",
            json!({"token": "cd".repeat(32), "password": "brandNewPass1"}),
        )
        .await;

    assert_eq!(expired_status, StatusCode::BAD_REQUEST);
    assert_eq!(expired_status, unknown_status);
    assert_eq!(expired_body, unknown_body);
}

#[tokio::test]
async fn new_request_invalidates_previous_token() {
    let app = TestApp::spawn();
    app.seed_account("applicant@example.com", "originalPass1").await;

    for _ in 0..2 {
        app.post_json(
            "/api/v1/auth/password-reset/request",
            json!({"email": "applicant@example.com"}),
        )
        .await;
    }
    let sent = app.relay.sent();
    assert_eq!(sent.len(), 2);
    let first = extract_token(sent[0].text_body.as_deref().unwrap());
    let second = extract_token(sent[1].text_body.as_deref().unwrap());
    assert_ne!(first, second);

    let (status, _) = app
        .post_json(
            "/api/v1/auth/password-reset/confirm",
            json!({"token": first, "password": "brandNewPass1"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post_json(
            "/api/v1/auth/password-reset/confirm",
            json!({"token": second, "password": "brandNewPass1"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn short_password_is_rejected_before_token_lookup() {
    let app = TestApp::spawn();

    let (status, _) = app
        .post_json(
            "/api/v1/auth/password-reset/confirm",
            json!({"token": "ab".repeat(32), "password": "short"}),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn health_check_reports_healthy() {
    let app = TestApp::spawn();

    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("healthy"));
    assert_eq!(body["service"], json!("jobportal-service"));
}
