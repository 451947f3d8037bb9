// The four administrative operations behind the admin gate

use secrecy::ExposeSecret;
use tracing::{error, info, warn};

use crate::admin::command::{AdminCommand, CreateUser, UpdateUser};
use crate::api::{IdentityProvider, ProfileStore};
use crate::auth::audit_logger::{AuditEvent, AuditLogger};
use crate::core::errors::AdminError;
use crate::core::models::{Account, NewProfile, ProfileUpdate, UserSummary};

/// Result of a successful command
#[derive(Debug)]
pub enum AdminOutcome {
    Listed(Vec<UserSummary>),
    Created(Account),
    Updated,
    Deleted,
}

/// Executes validated commands against the identity provider and profile store.
///
/// Calls are made one after another; nothing is retried.
pub struct UserAdmin<'a> {
    identity: &'a dyn IdentityProvider,
    profiles: &'a dyn ProfileStore,
    audit_logger: &'a AuditLogger,
    request_id: &'a str,
}

impl<'a> UserAdmin<'a> {
    pub fn new(
        identity: &'a dyn IdentityProvider,
        profiles: &'a dyn ProfileStore,
        audit_logger: &'a AuditLogger,
        request_id: &'a str,
    ) -> Self {
        Self {
            identity,
            profiles,
            audit_logger,
            request_id,
        }
    }

    pub async fn execute(&self, command: AdminCommand) -> Result<AdminOutcome, AdminError> {
        match command {
            AdminCommand::List => self.list().await.map(AdminOutcome::Listed),
            AdminCommand::Create(user) => self.create_with_rollback(user).await.map(AdminOutcome::Created),
            AdminCommand::Update(update) => self.update(update).await.map(|_| AdminOutcome::Updated),
            AdminCommand::Delete { id } => self.delete(&id).await.map(|_| AdminOutcome::Deleted),
        }
    }

    async fn list(&self) -> Result<Vec<UserSummary>, AdminError> {
        let users = self.profiles.list_profiles_with_account_info().await?;
        info!(count = users.len(), request_id = %self.request_id, "Listed users");
        Ok(users)
    }

    /// Create the account, then its profile; delete the account again if the
    /// profile insert fails.
    ///
    /// The rollback is a second, independent call. If it fails too, the
    /// account is left without a profile; that is logged and audited, and the
    /// caller still receives the original profile error.
    async fn create_with_rollback(&self, user: CreateUser) -> Result<Account, AdminError> {
        let account = self
            .identity
            .create_account(&user.email, user.password.expose_secret(), true)
            .await?;

        info!(account_id = %account.id, request_id = %self.request_id, "Account created");

        let profile = NewProfile {
            id: account.id.clone(),
            full_name: user.full_name,
            role: user.role,
            email: user.email,
        };

        if let Err(profile_err) = self.profiles.upsert_profile(&profile).await {
            warn!(
                error = %profile_err,
                account_id = %account.id,
                request_id = %self.request_id,
                "Profile creation failed, deleting account"
            );

            if let Err(rollback_err) = self.identity.delete_account(&account.id).await {
                error!(
                    error = %rollback_err,
                    account_id = %account.id,
                    request_id = %self.request_id,
                    "Account rollback failed"
                );
                self.audit_logger.log(
                    &AuditEvent::RollbackFailed {
                        account_id: account.id.clone(),
                        reason: rollback_err.to_string(),
                    },
                    Some(self.request_id),
                    None,
                );
            }

            return Err(AdminError::upstream("Failed to create user profile", profile_err.diagnostic()));
        }

        Ok(account)
    }

    async fn update(&self, update: UpdateUser) -> Result<(), AdminError> {
        let fields = ProfileUpdate {
            full_name: update.full_name,
            role: update.role,
        };
        self.profiles.update_profile(&update.id, &fields).await?;
        info!(target_id = %update.id, role = %fields.role, request_id = %self.request_id, "Profile updated");
        Ok(())
    }

    /// The profile row is removed by the store's cascade, not here
    async fn delete(&self, id: &str) -> Result<(), AdminError> {
        self.identity.delete_account(id).await?;
        info!(target_id = %id, request_id = %self.request_id, "Account deleted");
        Ok(())
    }
}
