use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    dtos::{PasswordResetConfirm, PasswordResetRequest},
    error::AppError,
    services::ServiceError,
    utils::ValidatedJson,
    AppState,
};

/// Request a password reset link.
///
/// Always answers 200 so the endpoint cannot be used to probe which email
/// addresses are registered.
pub async fn request_password_reset(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<PasswordResetRequest>,
) -> Result<impl IntoResponse, AppError> {
    let base_url = state.config.public_base_url.clone();
    state
        .recovery
        .request_reset(&req.email, &base_url)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to process password reset request");
            AppError::from(e)
        })?;

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({
            "success": true,
            "message": "If your email is registered, you will receive a password reset link shortly."
        })),
    ))
}

/// Confirm a password reset with a recovery token.
pub async fn confirm_password_reset(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<PasswordResetConfirm>,
) -> Result<Response, AppError> {
    match state.recovery.reset_password(&req.token, &req.password).await {
        Ok(_) => Ok((
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "message": "Password reset Successfully"
            })),
        )
            .into_response()),
        // Unknown, expired, and already-consumed tokens all land here with
        // the same response body.
        Err(ServiceError::InvalidToken) => Ok((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "success": false,
                "message": "Invalid Token"
            })),
        )
            .into_response()),
        Err(e) => {
            tracing::error!(error = %e, "Failed to confirm password reset");
            Err(e.into())
        }
    }
}
