use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{message}")]
    Validation {
        field: Option<&'static str>,
        message: String,
    },
    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),
    #[error("Order not found")]
    NotFound,
    #[error("Order number already taken: {0}")]
    Conflict(String),
    #[error("Cannot move {kind} from '{from}' to '{to}'")]
    InvalidTransition {
        kind: &'static str,
        from: &'static str,
        to: &'static str,
    },
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        DomainError::Validation {
            field: Some(field),
            message: message.into(),
        }
    }

    pub fn invalid_cart(message: impl Into<String>) -> Self {
        DomainError::Validation {
            field: Some("cart"),
            message: message.into(),
        }
    }
}

/// A stored or submitted label that does not name any known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownLabel {
    pub kind: &'static str,
    pub value: String,
}

impl From<UnknownLabel> for DomainError {
    fn from(e: UnknownLabel) -> Self {
        DomainError::Internal(e.to_string())
    }
}
