use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use setrack_core::AppResult;
use setrack_domain::{NewUserAccount, UserAccount, UserAccountPatch, UserRole};
use uuid::Uuid;

use super::common::double_option;

/// Incoming payload for account creation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub display_name: String,
    pub email: String,
    pub position: Option<String>,
    pub role: Option<String>,
    pub avatar_url: Option<String>,
}

impl CreateUserRequest {
    /// Converts the request into a validated creation input.
    pub fn into_input(self) -> AppResult<NewUserAccount> {
        let role = match self.role {
            Some(value) => UserRole::from_str(&value)?,
            None => UserRole::Staff,
        };

        Ok(NewUserAccount {
            display_name: self.display_name,
            email: self.email,
            position: self.position,
            role,
            avatar_url: self.avatar_url,
        })
    }
}

/// Incoming sparse payload for account updates.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub display_name: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub position: Option<Option<String>>,
    pub role: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub avatar_url: Option<Option<String>>,
    pub active: Option<bool>,
}

impl UpdateUserRequest {
    /// Converts the request into a domain patch.
    pub fn into_patch(self) -> AppResult<UserAccountPatch> {
        let role = self
            .role
            .map(|value| UserRole::from_str(&value))
            .transpose()?;

        Ok(UserAccountPatch {
            display_name: self.display_name,
            email: self.email,
            position: self.position,
            role,
            avatar_url: self.avatar_url,
            active: self.active,
        })
    }
}

/// Filters accepted by the user listing endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListQuery {
    pub search: Option<String>,
}

/// API representation of a user account.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    pub position: Option<String>,
    pub role: String,
    pub avatar_url: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserAccount> for UserResponse {
    fn from(value: UserAccount) -> Self {
        Self {
            id: value.id.as_uuid(),
            display_name: value.display_name,
            email: value.email,
            position: value.position,
            role: value.role.as_str().to_owned(),
            avatar_url: value.avatar_url,
            active: value.active,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}
