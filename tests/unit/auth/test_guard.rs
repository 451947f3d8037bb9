// Unit tests for the admin gate

use axum::http::{header, HeaderMap, HeaderValue};
use estate_user_admin::auth::audit_logger::AuditLogger;
use estate_user_admin::auth::guard::require_admin;
use estate_user_admin::core::errors::AdminError;

use crate::common::*;

fn bearer(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );
    headers
}

#[tokio::test]
async fn test_admin_caller_is_returned() {
    let backend = seeded_backend();
    let audit_logger = AuditLogger::new();

    let caller = require_admin(&*backend, &*backend, &audit_logger, &bearer(ADMIN_TOKEN), "req-1")
        .await
        .unwrap();

    assert_eq!(caller.id, ADMIN_ID);
    assert_eq!(caller.email.as_deref(), Some("admin@estate.test"));
}

#[tokio::test]
async fn test_missing_header_never_reaches_provider() {
    let backend = seeded_backend();
    let audit_logger = AuditLogger::new();

    let err = require_admin(&*backend, &*backend, &audit_logger, &HeaderMap::new(), "req-2")
        .await
        .unwrap_err();

    assert_eq!(err, AdminError::Unauthenticated("Missing authorization header".to_string()));
    assert_eq!(backend.calls.total(), 0);
}

#[tokio::test]
async fn test_non_admin_is_unauthorized() {
    let backend = seeded_backend();
    let audit_logger = AuditLogger::new();

    let err = require_admin(&*backend, &*backend, &audit_logger, &bearer(AGENT_TOKEN), "req-3")
        .await
        .unwrap_err();

    assert_eq!(
        err,
        AdminError::Unauthorized("Unauthorized - Admin access required".to_string())
    );
}

#[tokio::test]
async fn test_verification_error_fails_closed() {
    let backend = seeded_backend();
    InMemoryBackend::set(&backend.fail_verify, true);
    let audit_logger = AuditLogger::new();

    let err = require_admin(&*backend, &*backend, &audit_logger, &bearer(ADMIN_TOKEN), "req-4")
        .await
        .unwrap_err();

    assert_eq!(err, AdminError::Unauthenticated("Invalid token".to_string()));
}
