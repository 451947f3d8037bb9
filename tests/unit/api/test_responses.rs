// Unit tests for response bodies and error rendering

use axum::{http::StatusCode, response::IntoResponse};
use chrono::{TimeZone, Utc};
use estate_user_admin::admin::operations::AdminOutcome;
use estate_user_admin::api::responses::*;
use estate_user_admin::core::errors::AdminError;
use estate_user_admin::core::models::{Account, Role, UserSummary};
use serde_json::json;

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[test]
fn test_error_response_omits_absent_details() {
    let body = ErrorResponse {
        error: "Invalid token".to_string(),
        details: None,
    };
    assert_eq!(serde_json::to_value(&body).unwrap(), json!({ "error": "Invalid token" }));
}

#[test]
fn test_error_response_with_details() {
    let body = ErrorResponse {
        error: "Failed to delete account".to_string(),
        details: Some("User not found".to_string()),
    };
    assert_eq!(
        serde_json::to_value(&body).unwrap(),
        json!({ "error": "Failed to delete account", "details": "User not found" })
    );
}

#[test]
fn test_api_error_from_admin_error_status() {
    let cases = [
        (AdminError::Unauthenticated("Invalid token".to_string()), StatusCode::UNAUTHORIZED),
        (AdminError::Unauthorized("no".to_string()), StatusCode::UNAUTHORIZED),
        (AdminError::MissingField("userData.id".to_string()), StatusCode::BAD_REQUEST),
        (AdminError::InvalidAction("x".to_string()), StatusCode::BAD_REQUEST),
        (AdminError::upstream_message("boom"), StatusCode::INTERNAL_SERVER_ERROR),
        (AdminError::MethodNotAllowed("PUT".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (err, status) in cases {
        assert_eq!(ApiError::from(err).status, status);
    }
}

#[test]
fn test_configuration_error_is_not_leaked() {
    let err = ApiError::from(AdminError::ConfigurationError("SUPABASE_URL not set".to_string()));
    assert_eq!(err.message, "Internal error");
    assert!(err.details.is_none());
}

#[tokio::test]
async fn test_api_error_renders_envelope() {
    let response = ApiError::from(AdminError::upstream("Failed to create user profile", "duplicate key"))
        .into_response();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Failed to create user profile", "details": "duplicate key" })
    );
}

#[tokio::test]
async fn test_listed_outcome_renders_users() {
    let users = vec![UserSummary {
        id: "u-1".to_string(),
        full_name: Some("Ada".to_string()),
        role: Role::Agent,
        email: Some("ada@estate.test".to_string()),
        created_at: Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()),
        updated_at: None,
    }];

    let response = AdminOutcome::Listed(users).into_response();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["users"][0]["id"], "u-1");
    assert_eq!(body["users"][0]["role"], "agent");
    assert!(body["users"][0]["created_at"].as_str().unwrap().starts_with("2024-05-01T12:00:00"));
    assert!(body["users"][0]["updated_at"].is_null());
}

#[tokio::test]
async fn test_created_outcome_is_201() {
    let account = Account {
        id: "u-2".to_string(),
        email: Some("new@estate.test".to_string()),
        created_at: None,
        email_confirmed_at: None,
    };

    let response = AdminOutcome::Created(account).into_response();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["user"]["id"], "u-2");
}

#[tokio::test]
async fn test_updated_and_deleted_render_success() {
    for outcome in [AdminOutcome::Updated, AdminOutcome::Deleted] {
        let response = outcome.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "success": true }));
    }
}
