pub mod config;
pub mod dtos;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod templates;
pub mod utils;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method, Request},
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::services::{
    AccountStore, MailRelay, NotificationDispatcher, RecoveryService, RecoveryTokenService,
};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn AccountStore>,
    pub relay: Arc<dyn MailRelay>,
    pub recovery: RecoveryService,
    pub dispatcher: NotificationDispatcher,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn AccountStore>, relay: Arc<dyn MailRelay>) -> Self {
        let tokens = RecoveryTokenService::new(store.clone(), config.reset_token_ttl_minutes);
        let recovery = RecoveryService::new(store.clone(), tokens, relay.clone());
        let dispatcher = NotificationDispatcher::new(relay.clone());
        Self {
            config,
            store,
            relay,
            recovery,
            dispatcher,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/auth/password-reset/request",
            post(handlers::request_password_reset),
        )
        .route(
            "/auth/password-reset/confirm",
            post(handlers::confirm_password_reset),
        )
        .route("/emails/acceptance", post(handlers::send_acceptance_email))
        .route("/emails/rejection", post(handlers::send_rejection_email))
        .route("/emails/selection", post(handlers::send_selection_email));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api)
        .with_state(state)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(HeaderValue::from_static("*"))
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE]),
        )
}

/// Liveness and storage health probe.
pub async fn health_check(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    state.store.health_check().await.map_err(|e| {
        tracing::error!(error = %e, "Storage health check failed");
        e
    })?;

    Ok(Json(serde_json::json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    })))
}
