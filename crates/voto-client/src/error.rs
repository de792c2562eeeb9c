//! Error types for the Voto Seguro client

use std::fmt;
use thiserror::Error;

use crate::forms::FieldErrors;

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors raised while talking to the API or preparing a request
#[derive(Error, Debug)]
pub enum ApiError {
    /// Network failure before a response was received
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-2xx status other than 401
    #[error("API returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// The API answered 401; the session has already been expired
    #[error("Session expired or credentials rejected")]
    Unauthorized,

    /// The response body did not match the expected envelope
    #[error("Failed to decode response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    /// Client-side validation failed; nothing was sent
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid {parameter}: {message}")]
    InvalidInput { parameter: String, message: String },

    /// The view that issued the request was disposed before it finished
    #[error("Operation cancelled")]
    Cancelled,
}

impl ApiError {
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    pub fn decode(endpoint: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Decode {
            endpoint: endpoint.into(),
            message: message.to_string(),
        }
    }

    pub fn not_found(resource: impl Into<String>, id: impl fmt::Display) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.to_string(),
        }
    }

    pub fn invalid_input(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// HTTP status carried by this error, if any
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Unauthorized => Some(401),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Turn a 404 status into a typed `NotFound` for the given resource
    pub fn or_not_found(self, resource: &str, id: impl fmt::Display) -> Self {
        match self {
            Self::Status { status: 404, .. } => Self::not_found(resource, id),
            other => other,
        }
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}
