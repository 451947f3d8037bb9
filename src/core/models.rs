// Domain types shared by the façade, its collaborators and the HTTP layer

use crate::core::errors::AdminError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role stored on a profile row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Public,
    Authenticated,
    Agent,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Public => "public",
            Role::Authenticated => "authenticated",
            Role::Agent => "agent",
            Role::Admin => "admin",
        }
    }

    /// Validate a raw role coming from a create/update request.
    ///
    /// Only `authenticated` and `admin` may be assigned through the façade;
    /// `agent`, `public` and anything unknown are `InvalidInput`.
    pub fn parse_assignable(raw: &str) -> Result<Role, AdminError> {
        match raw.parse::<Role>() {
            Ok(role @ (Role::Authenticated | Role::Admin)) => Ok(role),
            _ => Err(AdminError::InvalidInput(format!(
                "Invalid role '{}': must be one of authenticated, admin",
                raw
            ))),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Role::Public),
            "authenticated" => Ok(Role::Authenticated),
            "agent" => Ok(Role::Agent),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity-provider account as returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub email_confirmed_at: Option<DateTime<Utc>>,
}

/// Application-level profile row, one-to-one with an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Caller resolved from a bearer token for the duration of one request
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CallerIdentity {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Row of the `list` action: profile joined with account info
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserSummary {
    pub id: String,
    pub full_name: Option<String>,
    pub role: Role,
    pub email: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Profile written right after account creation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewProfile {
    pub id: String,
    pub full_name: Option<String>,
    pub role: Role,
    pub email: String,
}

/// Fields the `update` action may change
///
/// `full_name`: `None` keeps the stored value, `Some(None)` clears it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<Option<String>>,
    pub role: Role,
}
