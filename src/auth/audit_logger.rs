// Security event logging

use crate::auth::bearer::TokenFingerprint;
use tracing::{error, info, warn};

/// Security-relevant event raised by the façade
#[derive(Debug, Clone, PartialEq)]
pub enum AuditEvent {
    AuthFailure { reason: String },
    AccessDenied { caller_id: String, reason: String },
    AdminAction {
        caller_id: String,
        action: &'static str,
        target_id: Option<String>,
    },
    /// Account survived a failed create because its rollback delete failed
    RollbackFailed { account_id: String, reason: String },
}

impl AuditEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            AuditEvent::AuthFailure { .. } => "AUTH_FAILURE",
            AuditEvent::AccessDenied { .. } => "ACCESS_DENIED",
            AuditEvent::AdminAction { .. } => "ADMIN_ACTION",
            AuditEvent::RollbackFailed { .. } => "ROLLBACK_FAILED",
        }
    }
}

/// Audit logger for security events
///
/// Events go to the structured log only. Logging is synchronous: the façade
/// never leaves work running after the response.
#[derive(Debug, Clone)]
pub struct AuditLogger {
    target: &'static str,
}

impl Default for AuditLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl AuditLogger {
    pub fn new() -> Self {
        Self { target: "audit" }
    }

    pub fn log(
        &self,
        event: &AuditEvent,
        request_id: Option<&str>,
        token: Option<&TokenFingerprint>,
    ) {
        let token = token.map(|t| t.as_str());
        let event_type = event.event_type();
        match event {
            AuditEvent::AuthFailure { reason } => {
                warn!(
                    audit = self.target,
                    event_type,
                    request_id = ?request_id,
                    token_fingerprint = ?token,
                    reason = %reason,
                    "Authentication failed"
                );
            }
            AuditEvent::AccessDenied { caller_id, reason } => {
                warn!(
                    audit = self.target,
                    event_type,
                    request_id = ?request_id,
                    token_fingerprint = ?token,
                    caller_id = %caller_id,
                    reason = %reason,
                    "Admin access denied"
                );
            }
            AuditEvent::AdminAction { caller_id, action, target_id } => {
                info!(
                    audit = self.target,
                    event_type,
                    request_id = ?request_id,
                    caller_id = %caller_id,
                    action = %action,
                    target_id = ?target_id,
                    "Admin action performed"
                );
            }
            AuditEvent::RollbackFailed { account_id, reason } => {
                error!(
                    audit = self.target,
                    event_type,
                    request_id = ?request_id,
                    account_id = %account_id,
                    reason = %reason,
                    "Account rollback failed, account left without profile"
                );
            }
        }
    }
}
