//! Request/response DTOs.
//!
//! Wire field names are camelCase: the hiring endpoints keep the platform's
//! existing public API contract.

use crate::services::NotificationRequest;
use crate::templates::{EmailKind, TemplateFields};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PasswordResetRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PasswordResetConfirm {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Payload shared by the three hiring-email endpoints.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct HiringEmailRequest {
    #[validate(email(message = "Invalid applicant email"))]
    pub applicant_email: String,

    #[validate(length(min = 1, message = "Applicant name is required"))]
    pub applicant_name: String,

    #[validate(length(min = 1, message = "Job title is required"))]
    pub job_title: String,

    #[validate(length(min = 1, message = "Company name is required"))]
    pub company_name: String,

    #[validate(email(message = "Invalid contact email"))]
    pub contact_email: String,

    // Workflow metadata attached by the caller; pass-through only.
    pub application_id: Option<String>,
    pub job_id: Option<String>,

    /// Optional explicit kind; must parse to a known kind when present.
    pub email_type: Option<String>,
}

impl HiringEmailRequest {
    pub fn into_notification(self, kind: EmailKind) -> NotificationRequest {
        NotificationRequest {
            kind,
            recipient_email: self.applicant_email,
            fields: TemplateFields {
                applicant_name: self.applicant_name,
                job_title: self.job_title,
                company_name: self.company_name,
                contact_email: self.contact_email,
            },
        }
    }
}
