// Axum web server layer

use axum::{routing::{any, get}, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;

pub mod handlers;
pub mod middleware;
pub mod responses;

use crate::auth::audit_logger::AuditLogger;
use crate::core::errors::AdminError;
use crate::core::models::{Account, CallerIdentity, NewProfile, Profile, ProfileUpdate, UserSummary};

/// Configuration struct
// Re-export Config from config module
pub use crate::config::Config;

/// Path of the user-management endpoint
pub const MANAGE_USERS_PATH: &str = "/manage-users";

/// Application state containing all shared dependencies
///
/// Collaborators are created once at start-up and shared by every request.
/// Tests substitute in-memory implementations.
#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<dyn IdentityProvider + Send + Sync>,
    pub profiles: Arc<dyn ProfileStore + Send + Sync>,
    pub audit_logger: Arc<AuditLogger>,
    pub config: Arc<Config>,
}

/// Identity provider: verifies tokens and owns accounts
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve a caller token. `Ok(None)` means the token is not valid.
    async fn verify_token(&self, token: &str) -> Result<Option<CallerIdentity>, AdminError>;
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        pre_verified: bool,
    ) -> Result<Account, AdminError>;
    async fn delete_account(&self, id: &str) -> Result<(), AdminError>;
}

/// Relational store holding the `profiles` table
#[async_trait::async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_profile(&self, id: &str) -> Result<Option<Profile>, AdminError>;
    /// All profiles joined with account email and creation time, newest first
    async fn list_profiles_with_account_info(&self) -> Result<Vec<UserSummary>, AdminError>;
    async fn upsert_profile(&self, profile: &NewProfile) -> Result<(), AdminError>;
    async fn update_profile(&self, id: &str, fields: &ProfileUpdate) -> Result<(), AdminError>;
}

/// Create the Axum router with all routes and middleware
///
/// Middleware stack (outermost to innermost):
/// - CORS headers - stamped on every response, errors and 404s included
/// - Tracing (tower-http::trace)
/// - Body size limit (tower-http::limit)
///
/// The manage-users route accepts every method so the handler itself answers
/// preflight and rejects other verbs with the JSON envelope.
pub fn create_router(app_state: &AppState) -> Router<AppState> {
    let body_limit = app_state.config.body_size_limit_bytes;

    let router = Router::new()
        .route(MANAGE_USERS_PATH, any(handlers::manage_users_handler))
        .route("/health", get(handlers::health_handler));

    let middleware_stack = ServiceBuilder::new()
        .layer(axum::middleware::map_response(middleware::apply_cors_headers))
        .layer(middleware::tracing_layer())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .into_inner();

    router.layer(middleware_stack)
}
