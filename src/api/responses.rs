// Response types for the manage-users endpoint

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::admin::operations::AdminOutcome;
use crate::core::errors::AdminError;
use crate::core::models::{Account, UserSummary};

/// `list` response body
#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<UserSummary>,
}

/// `create` response body
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: Account,
}

/// `update` / `delete` response body
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Error response structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

impl IntoResponse for AdminOutcome {
    fn into_response(self) -> Response {
        match self {
            AdminOutcome::Listed(users) => {
                (StatusCode::OK, Json(UsersResponse { users })).into_response()
            }
            AdminOutcome::Created(user) => {
                (StatusCode::CREATED, Json(UserResponse { user })).into_response()
            }
            AdminOutcome::Updated | AdminOutcome::Deleted => {
                (StatusCode::OK, Json(SuccessResponse { success: true })).into_response()
            }
        }
    }
}

/// API error type that converts domain errors to HTTP responses
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<String>,
}

impl ApiError {
    /// Create from AdminError
    pub fn from_admin_error(err: &AdminError) -> Self {
        let status = StatusCode::from_u16(err.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self {
            status,
            message: err.user_message(),
            details: err.details(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.message,
            details: self.details,
        });
        (self.status, body).into_response()
    }
}

impl From<AdminError> for ApiError {
    fn from(err: AdminError) -> Self {
        ApiError::from_admin_error(&err)
    }
}
