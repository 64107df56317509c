use color_eyre::eyre::Report;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthAPIError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Missing token")]
    MissingToken,
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
}

#[derive(Debug, Error)]
pub enum ProjectAPIError {
    #[error("Authentication error")]
    AuthenticationError(#[from] AuthAPIError),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Resource with ID not found: {0}")]
    IDNotFoundError(uuid::Uuid),
    #[error("Too many requests")]
    RateLimited,
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
    #[error("Validation error")]
    ValidationError(#[from] ValidationError),
}

/// A single failed rule, addressed to the form field it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_owned(),
            message: message.to_owned(),
        }
    }
}

#[derive(Debug, Error)]
#[error("Validation error: {message}")]
pub struct ValidationError {
    message: String,
    details: Vec<FieldError>,
}

impl ValidationError {
    pub const FAILED: &'static str = "Validation failed";

    pub fn new(message: String) -> Self {
        Self {
            message,
            details: Vec::new(),
        }
    }

    pub fn failed(details: Vec<FieldError>) -> Self {
        Self {
            message: Self::FAILED.to_owned(),
            details,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> &[FieldError] {
        &self.details
    }
}
