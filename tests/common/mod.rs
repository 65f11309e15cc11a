#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use jobportal_service::{
    build_router,
    config::{AppConfig, DatabaseConfig, SmtpConfig},
    models::Account,
    services::{AccountStore, InMemoryAccountStore, MockMailRelay},
    AppState,
};
use jobportal_service::utils::{hash_password, Password};
use tower::util::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryAccountStore>,
    pub relay: Arc<MockMailRelay>,
}

impl TestApp {
    pub fn spawn() -> Self {
        Self::build(MockMailRelay::new())
    }

    pub fn spawn_with_failing_relay() -> Self {
        Self::build(MockMailRelay::failing())
    }

    fn build(relay: MockMailRelay) -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .try_init();

        let store = Arc::new(InMemoryAccountStore::new());
        let relay = Arc::new(relay);
        let state = AppState::new(test_config(), store.clone(), relay.clone());
        let router = build_router(state);
        Self {
            router,
            store,
            relay,
        }
    }

    /// Register an account directly in the store, returning it with the
    /// plaintext password it was seeded with.
    pub async fn seed_account(&self, email: &str, password: &str) -> Account {
        let hash = hash_password(&Password::new(password.to_string()))
            .expect("Failed to hash seed password");
        let account = Account::new(
            email.to_string(),
            hash.into_string(),
            Some("Test Applicant".to_string()),
        );
        self.store
            .insert(&account)
            .await
            .expect("Failed to seed account");
        account
    }

    pub async fn post_json(
        &self,
        uri: &str,
        payload: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        let response = self
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("Content-Type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = self
            .router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        port: 0,
        log_level: "debug".to_string(),
        public_base_url: "http://localhost:8000".to_string(),
        database: DatabaseConfig {
            url: "postgres://localhost:5432/jobportal_test".to_string(),
            max_connections: 1,
        },
        smtp: SmtpConfig {
            host: "localhost".to_string(),
            port: 587,
            implicit_tls: false,
            user: String::new(),
            password: String::new(),
            from_email: "noreply@example.com".to_string(),
            from_name: "Job Portal".to_string(),
            enabled: false,
        },
        reset_token_ttl_minutes: 15,
    }
}
