// Authentication and admin authorization gate

use axum::http::HeaderMap;
use tracing::{debug, error};

use crate::api::{IdentityProvider, ProfileStore};
use crate::auth::audit_logger::{AuditEvent, AuditLogger};
use crate::auth::bearer::BearerToken;
use crate::core::errors::AdminError;
use crate::core::models::{CallerIdentity, Role};

/// Resolve the caller behind the request and require the `admin` role.
///
/// 1. Extract the bearer token (missing/malformed -> `Unauthenticated`)
/// 2. Verify it with the identity provider (error or no user -> `Unauthenticated`)
/// 3. Fetch the caller's profile (error, absent or non-admin -> `Unauthorized`)
///
/// Nothing is mutated before this returns `Ok`.
pub async fn require_admin(
    identity: &dyn IdentityProvider,
    profiles: &dyn ProfileStore,
    audit_logger: &AuditLogger,
    headers: &HeaderMap,
    request_id: &str,
) -> Result<CallerIdentity, AdminError> {
    let token = match BearerToken::from_headers(headers) {
        Ok(token) => token,
        Err(e) => {
            audit_logger.log(
                &AuditEvent::AuthFailure { reason: e.user_message() },
                Some(request_id),
                None,
            );
            return Err(e);
        }
    };
    let fingerprint = token.fingerprint();

    let caller = match identity.verify_token(token.expose_secret()).await {
        Ok(Some(caller)) => caller,
        Ok(None) => {
            audit_logger.log(
                &AuditEvent::AuthFailure { reason: "Invalid token".to_string() },
                Some(request_id),
                Some(&fingerprint),
            );
            return Err(AdminError::Unauthenticated("Invalid token".to_string()));
        }
        Err(e) => {
            error!(error = %e, request_id = %request_id, "Token verification failed");
            audit_logger.log(
                &AuditEvent::AuthFailure { reason: e.to_string() },
                Some(request_id),
                Some(&fingerprint),
            );
            return Err(AdminError::Unauthenticated("Invalid token".to_string()));
        }
    };

    let denial = match profiles.get_profile(&caller.id).await {
        Ok(Some(profile)) if profile.role == Role::Admin => None,
        Ok(Some(profile)) => Some(format!("caller role is {}", profile.role)),
        Ok(None) => Some("caller has no profile".to_string()),
        Err(e) => {
            error!(error = %e, caller_id = %caller.id, request_id = %request_id, "Caller profile lookup failed");
            Some(format!("profile lookup failed: {}", e))
        }
    };

    if let Some(reason) = denial {
        audit_logger.log(
            &AuditEvent::AccessDenied {
                caller_id: caller.id.clone(),
                reason,
            },
            Some(request_id),
            Some(&fingerprint),
        );
        return Err(AdminError::Unauthorized("Unauthorized - Admin access required".to_string()));
    }

    debug!(caller_id = %caller.id, request_id = %request_id, "Admin caller authorized");
    Ok(caller)
}
