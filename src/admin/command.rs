// Request body parsing and validation for the manage-users endpoint

use secrecy::Secret;
use serde::{Deserialize, Deserializer};

use crate::core::errors::AdminError;
use crate::core::models::Role;

/// Raw JSON body: `{ action, userData? }`
#[derive(Debug, Default, Deserialize)]
pub struct AdminRequest {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default, rename = "userData")]
    pub user_data: Option<UserData>,
}

/// Raw `userData` object; which fields are required depends on the action
#[derive(Debug, Default, Deserialize)]
pub struct UserData {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// `None` when omitted, `Some(None)` when sent as `null`
    #[serde(default, deserialize_with = "explicit_null")]
    pub full_name: Option<Option<String>>,
    #[serde(default)]
    pub role: Option<String>,
}

fn explicit_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

#[derive(Debug)]
pub struct CreateUser {
    pub email: String,
    pub password: Secret<String>,
    pub full_name: Option<String>,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateUser {
    pub id: String,
    /// Outer `None` leaves the stored name untouched
    pub full_name: Option<Option<String>>,
    pub role: Role,
}

/// Validated action, ready to execute
#[derive(Debug)]
pub enum AdminCommand {
    List,
    Create(CreateUser),
    Update(UpdateUser),
    Delete { id: String },
}

impl AdminCommand {
    pub fn name(&self) -> &'static str {
        match self {
            AdminCommand::List => "list",
            AdminCommand::Create(_) => "create",
            AdminCommand::Update(_) => "update",
            AdminCommand::Delete { .. } => "delete",
        }
    }

    /// Parse and validate a request body.
    ///
    /// Required fields are checked before role values, so a create request
    /// missing `password` reports the missing field even if its role is bad.
    pub fn from_body(body: &[u8]) -> Result<Self, AdminError> {
        let request: AdminRequest = serde_json::from_slice(body)
            .map_err(|e| AdminError::InvalidInput(format!("Invalid JSON body: {}", e)))?;
        Self::from_request(request)
    }

    pub fn from_request(request: AdminRequest) -> Result<Self, AdminError> {
        let action = request
            .action
            .ok_or_else(|| AdminError::InvalidAction("missing".to_string()))?;
        let data = request.user_data.unwrap_or_default();

        match action.as_str() {
            "list" => Ok(AdminCommand::List),
            "create" => {
                let email = required(data.email, "userData.email")?;
                let password = required(data.password, "userData.password")?;
                let role = required(data.role, "userData.role")?;
                let role = Role::parse_assignable(&role)?;
                Ok(AdminCommand::Create(CreateUser {
                    email,
                    password: Secret::new(password),
                    full_name: data.full_name.flatten(),
                    role,
                }))
            }
            "update" => {
                let id = required(data.id, "userData.id")?;
                let role = required(data.role, "userData.role")?;
                let role = Role::parse_assignable(&role)?;
                Ok(AdminCommand::Update(UpdateUser {
                    id,
                    full_name: data.full_name,
                    role,
                }))
            }
            "delete" => {
                let id = required(data.id, "userData.id")?;
                Ok(AdminCommand::Delete { id })
            }
            other => Err(AdminError::InvalidAction(other.to_string())),
        }
    }
}

/// Absent and empty strings both count as missing
fn required(value: Option<String>, field: &str) -> Result<String, AdminError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AdminError::MissingField(field.to_string())),
    }
}
