use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    dtos::HiringEmailRequest,
    error::AppError,
    services::{DispatchResult, ServiceError},
    templates::EmailKind,
    utils::ValidatedJson,
    AppState,
};

/// Notify an applicant that their application was accepted.
pub async fn send_acceptance_email(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<HiringEmailRequest>,
) -> Result<Response, AppError> {
    let kind = resolve_kind(&req, EmailKind::Accepted)?;
    let result = state.dispatcher.dispatch(&req.into_notification(kind)).await?;
    Ok(dispatch_response(
        StatusCode::CREATED,
        Some("Application accepted and email sent."),
        result,
    ))
}

/// Notify an applicant that their application was not retained.
pub async fn send_rejection_email(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<HiringEmailRequest>,
) -> Result<Response, AppError> {
    let kind = resolve_kind(&req, EmailKind::Rejected)?;
    let result = state.dispatcher.dispatch(&req.into_notification(kind)).await?;
    Ok(dispatch_response(StatusCode::OK, None, result))
}

/// Notify a selected candidate, including onboarding details.
pub async fn send_selection_email(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<HiringEmailRequest>,
) -> Result<Response, AppError> {
    let kind = resolve_kind(&req, EmailKind::Selected)?;
    let result = state.dispatcher.dispatch(&req.into_notification(kind)).await?;
    Ok(dispatch_response(
        StatusCode::CREATED,
        Some("Job selection email sent."),
        result,
    ))
}

/// The payload may carry an explicit `emailType`; when it does, it must parse
/// to a known kind, and it wins over the endpoint default.
fn resolve_kind(req: &HiringEmailRequest, default: EmailKind) -> Result<EmailKind, AppError> {
    match &req.email_type {
        Some(raw) => EmailKind::parse(raw)
            .ok_or_else(|| ServiceError::UnsupportedKind(raw.clone()).into()),
        None => Ok(default),
    }
}

fn dispatch_response(
    success_status: StatusCode,
    message: Option<&str>,
    result: DispatchResult,
) -> Response {
    if result.success {
        let message_id = result.provider_message_id.clone();
        let mut body = serde_json::json!({
            "success": true,
            "data": result,
            "messageId": message_id,
        });
        if let Some(message) = message {
            body["message"] = serde_json::Value::String(message.to_string());
        }
        (success_status, Json(body)).into_response()
    } else {
        let error = result
            .error_detail
            .unwrap_or_else(|| "mail relay failure".to_string());
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "success": false,
                "error": error,
            })),
        )
            .into_response()
    }
}
