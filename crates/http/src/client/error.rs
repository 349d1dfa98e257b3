//! Client error types

use shop_core::CoreError;
use thiserror::Error;

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network failure, including timeouts
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Backend answered 401; the session has already been cleared
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Forbidden
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Bad request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Server returned another error status
    #[error("Server error {status}: {message}")]
    ServerError { status: u16, message: String },

    /// Backend answered successfully but refused the operation
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// Caller supplied bad input
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Session store failure other than validation
    #[error("Session error: {0}")]
    Session(CoreError),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Create error from HTTP status code and response body
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = extract_message(body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .map_or_else(|| status.to_string(), str::to_string)
        });

        match status.as_u16() {
            400 => Self::BadRequest(message),
            401 => Self::Unauthorized(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            _ => Self::ServerError {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// HTTP status the backend answered with, if there was a response
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::BadRequest(_) => Some(400),
            Self::Unauthorized(_) => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::NotFound(_) => Some(404),
            Self::ServerError { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Request(e) if e.is_timeout())
    }

    /// Message supplied by the backend, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Unauthorized(message)
            | Self::Forbidden(message)
            | Self::NotFound(message)
            | Self::BadRequest(message)
            | Self::Rejected(message)
            | Self::ServerError { message, .. } => Some(message.as_str()),
            _ => None,
        }
    }

    /// Most specific message to show a user, falling back to `default`
    pub fn user_message(&self, default: &str) -> String {
        let message = match self {
            Self::Validation(message) => message.clone(),
            _ => self
                .server_message()
                .map_or_else(|| self.to_string(), str::to_string),
        };

        if message.trim().is_empty() {
            default.to_string()
        } else {
            message
        }
    }
}

impl From<CoreError> for ClientError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation { message } => Self::Validation(message),
            other => Self::Session(other),
        }
    }
}

/// Pull a human readable message out of an error body
///
/// JSON bodies contribute their `message` field; anything else is used as
/// plain text.
fn extract_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => value
            .get("message")
            .and_then(serde_json::Value::as_str)
            .filter(|message| !message.is_empty())
            .map(str::to_string),
        Err(_) => Some(body.to_string()),
    }
}
