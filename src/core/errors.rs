// Failure taxonomy for the user-management façade

use thiserror::Error;

/// Main error type for the façade
///
/// Every request path resolves to exactly one of these. The HTTP layer maps
/// them to a status code and a JSON envelope via `status_code`,
/// `user_message` and `details`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdminError {
    /// Request used a verb other than POST (and was not a preflight)
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    /// Missing or unresolvable bearer token (HTTP 401)
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Caller resolved but is not an administrator (HTTP 401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Required `userData` field absent (HTTP 400)
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Field present but outside the accepted values (HTTP 400)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unknown or missing `action` (HTTP 400)
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Identity provider or profile store rejected the call (HTTP 500)
    #[error("{message}")]
    Upstream {
        message: String,
        details: Option<String>,
    },

    /// Start-up configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl AdminError {
    /// Upstream failure with a diagnostic taken from the underlying error
    pub fn upstream(message: impl Into<String>, details: impl ToString) -> Self {
        AdminError::Upstream {
            message: message.into(),
            details: Some(details.to_string()),
        }
    }

    /// Upstream failure without diagnostic detail
    pub fn upstream_message(message: impl Into<String>) -> Self {
        AdminError::Upstream {
            message: message.into(),
            details: None,
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            AdminError::Unauthenticated(_) | AdminError::Unauthorized(_) => 401,
            AdminError::MissingField(_)
            | AdminError::InvalidInput(_)
            | AdminError::InvalidAction(_) => 400,
            AdminError::MethodNotAllowed(_)
            | AdminError::Upstream { .. }
            | AdminError::ConfigurationError(_) => 500,
        }
    }

    /// Get the message placed in the `error` field of the envelope
    pub fn user_message(&self) -> String {
        match self {
            AdminError::MethodNotAllowed(_) => "Method not allowed".to_string(),
            AdminError::Unauthenticated(reason) => reason.clone(),
            AdminError::Unauthorized(reason) => reason.clone(),
            AdminError::MissingField(field) => format!("Missing required field: {}", field),
            AdminError::InvalidInput(reason) => reason.clone(),
            AdminError::InvalidAction(action) => format!("Invalid action: {}", action),
            AdminError::Upstream { message, .. } => message.clone(),
            AdminError::ConfigurationError(_) => "Internal error".to_string(),
        }
    }

    /// Diagnostic for the optional `details` field of the envelope
    pub fn details(&self) -> Option<String> {
        match self {
            AdminError::Upstream { details, .. } => details.clone(),
            AdminError::MethodNotAllowed(method) => Some(format!("Received {}", method)),
            _ => None,
        }
    }

    /// Message plus details, for logs and for wrapping into another error
    pub fn diagnostic(&self) -> String {
        match self.details() {
            Some(details) => format!("{}: {}", self, details),
            None => self.to_string(),
        }
    }
}
