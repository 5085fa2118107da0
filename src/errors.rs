use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde_json::json;
use thiserror::Error;

use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    Validation {
        field: Option<&'static str>,
        message: String,
    },

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Service temporarily unavailable")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: Some(field),
            message: message.into(),
        }
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation { field, message } => AppError::Validation { field, message },
            e @ DomainError::ProductNotFound(_) => AppError::NotFound(e.to_string()),
            e @ DomainError::NotFound => AppError::NotFound(e.to_string()),
            e @ (DomainError::Conflict(_) | DomainError::InvalidTransition { .. }) => {
                AppError::Conflict(e.to_string())
            }
            DomainError::Forbidden(msg) => AppError::Forbidden(msg),
            DomainError::StoreUnavailable(msg) => AppError::Unavailable(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        match self {
            AppError::Validation { field, message } => HttpResponse::build(status).json(json!({
                "error": message,
                "field": field,
            })),
            AppError::Unavailable(detail) => {
                log::error!("Store unavailable: {}", detail);
                HttpResponse::build(status).json(json!({ "error": self.to_string() }))
            }
            AppError::Internal(detail) => {
                log::error!("Internal error: {}", detail);
                HttpResponse::build(status).json(json!({ "error": "Internal server error" }))
            }
            _ => HttpResponse::build(status).json(json!({ "error": self.to_string() })),
        }
    }
}
