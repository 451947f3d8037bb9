// Request handlers for API endpoints

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Json, Response},
};
use tracing::{error, info, warn};

use crate::admin::command::AdminCommand;
use crate::admin::operations::{AdminOutcome, UserAdmin};
use crate::api::responses::{ApiError, HealthResponse};
use crate::api::AppState;
use crate::auth::audit_logger::AuditEvent;
use crate::auth::guard::require_admin;
use crate::core::errors::AdminError;

/// User-management handler
///
/// ANY /manage-users
///
/// Request flow:
/// 1. OPTIONS: answer the preflight, nothing else runs
/// 2. Reject any verb other than POST
/// 3. Resolve the bearer token to a caller
/// 4. Require the caller's profile role to be `admin`
/// 5. Parse `{ action, userData }` and dispatch
///
/// CORS headers are added to every response by the router middleware.
pub async fn manage_users_handler(
    State(app_state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }

    let request_id = headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    match handle_admin_request(&app_state, &method, &headers, &body, &request_id).await {
        Ok(response) => response,
        Err(e) => {
            if e.status_code() >= 500 {
                error!(error = %e.diagnostic(), request_id = %request_id, "Manage-users request failed");
            } else {
                warn!(error = %e, request_id = %request_id, "Manage-users request rejected");
            }
            ApiError::from(e).into_response()
        }
    }
}

async fn handle_admin_request(
    app_state: &AppState,
    method: &Method,
    headers: &HeaderMap,
    body: &[u8],
    request_id: &str,
) -> Result<Response, AdminError> {
    if *method != Method::POST {
        return Err(AdminError::MethodNotAllowed(method.to_string()));
    }

    let caller = require_admin(
        app_state.identity.as_ref(),
        app_state.profiles.as_ref(),
        &app_state.audit_logger,
        headers,
        request_id,
    )
    .await?;

    let command = AdminCommand::from_body(body)?;
    let action = command.name();
    let target_id = match &command {
        AdminCommand::Update(update) => Some(update.id.clone()),
        AdminCommand::Delete { id } => Some(id.clone()),
        AdminCommand::List | AdminCommand::Create(_) => None,
    };

    info!(action, caller_id = %caller.id, request_id = %request_id, "Dispatching admin action");

    let admin = UserAdmin::new(
        app_state.identity.as_ref(),
        app_state.profiles.as_ref(),
        &app_state.audit_logger,
        request_id,
    );
    let outcome = admin.execute(command).await?;

    if action != "list" {
        let target_id = match &outcome {
            AdminOutcome::Created(account) => Some(account.id.clone()),
            _ => target_id,
        };
        app_state.audit_logger.log(
            &AuditEvent::AdminAction {
                caller_id: caller.id,
                action,
                target_id,
            },
            Some(request_id),
            None,
        );
    }

    Ok(outcome.into_response())
}

/// Health check handler
///
/// GET /health
///
/// Does not contact the backend.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}
