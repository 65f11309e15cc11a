use crate::error::AppError;
use crate::services::relay::RelayError;
use crate::templates::TemplateError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Storage(#[from] AppError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),

    /// Covers both "no such token" and "token expired"; callers must not be
    /// able to tell the two apart.
    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Unsupported email kind: {0}")]
    UnsupportedKind(String),

    #[error("Mail relay error: {0}")]
    Relay(#[from] RelayError),
}

impl From<RelayError> for AppError {
    fn from(err: RelayError) -> Self {
        AppError::from(ServiceError::Relay(err))
    }
}

impl From<TemplateError> for ServiceError {
    fn from(err: TemplateError) -> Self {
        match err {
            TemplateError::MissingField(field) => ServiceError::MissingField(field),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Storage(e) => e,
            ServiceError::Internal(e) => AppError::InternalError(e),
            ServiceError::InvalidToken => AppError::BadRequest(anyhow::anyhow!("Invalid Token")),
            ServiceError::MissingField(field) => {
                AppError::BadRequest(anyhow::anyhow!("Missing required field: {}", field))
            }
            ServiceError::UnsupportedKind(kind) => {
                AppError::BadRequest(anyhow::anyhow!("Unsupported email kind: {}", kind))
            }
            ServiceError::Relay(e) => AppError::EmailError(e.to_string()),
        }
    }
}
