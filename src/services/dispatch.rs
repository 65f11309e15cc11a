//! Hiring-email dispatch: render the template for the event kind and hand the
//! composed message to the mail relay.

use crate::services::{MailRelay, OutboundEmail, ServiceError};
use crate::templates::{self, EmailKind, TemplateFields};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

/// One hiring-workflow notification, constructed per call and not persisted.
#[derive(Debug, Clone)]
pub struct NotificationRequest {
    pub kind: EmailKind,
    pub recipient_email: String,
    pub fields: TemplateFields,
}

/// Synchronous outcome of one dispatch attempt.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
}

impl DispatchResult {
    pub fn sent(provider_message_id: Option<String>) -> Self {
        Self {
            success: true,
            provider_message_id,
            error_detail: None,
        }
    }

    pub fn failed(error_detail: String) -> Self {
        Self {
            success: false,
            provider_message_id: None,
            error_detail: Some(error_detail),
        }
    }
}

/// Dispatcher over an explicitly injected relay handle.
#[derive(Clone)]
pub struct NotificationDispatcher {
    relay: Arc<dyn MailRelay>,
}

impl NotificationDispatcher {
    pub fn new(relay: Arc<dyn MailRelay>) -> Self {
        Self { relay }
    }

    /// Render and relay one notification.
    ///
    /// Template violations (missing fields) are errors and reach the relay
    /// never; relay failures are data in the returned `DispatchResult`, so a
    /// flaky provider cannot take the handler down. No internal retry: the
    /// caller decides whether re-sending is worth it.
    pub async fn dispatch(
        &self,
        request: &NotificationRequest,
    ) -> Result<DispatchResult, ServiceError> {
        let today = Utc::now().date_naive();
        let html_body = templates::render(request.kind, &request.fields, today)?;
        let subject = request.kind.subject(&request.fields.job_title);

        let email = OutboundEmail {
            to: request.recipient_email.clone(),
            subject,
            html_body,
            text_body: None,
        };

        match self.relay.send(&email).await {
            Ok(receipt) => {
                tracing::info!(
                    to = %request.recipient_email,
                    kind = %request.kind.as_str(),
                    "Hiring email relayed"
                );
                Ok(DispatchResult::sent(receipt.message_id))
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    to = %request.recipient_email,
                    kind = %request.kind.as_str(),
                    "Failed to relay hiring email"
                );
                Ok(DispatchResult::failed(e.to_string()))
            }
        }
    }
}
