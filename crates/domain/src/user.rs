use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use setrack_core::{AppError, UserId};

use crate::patch::apply_field;

/// Access levels for program staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// Full administrative access.
    Admin,
    /// Program staff with write access.
    Staff,
    /// Read-only access.
    Viewer,
}

impl UserRole {
    /// Returns a stable storage value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Staff => "STAFF",
            Self::Viewer => "VIEWER",
        }
    }
}

impl FromStr for UserRole {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "ADMIN" => Ok(Self::Admin),
            "STAFF" => Ok(Self::Staff),
            "VIEWER" => Ok(Self::Viewer),
            _ => Err(AppError::Validation(format!("unknown user role '{value}'"))),
        }
    }
}

/// A staff member account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    /// Stable identifier.
    pub id: UserId,
    /// Name shown in the UI and in notification messages.
    pub display_name: String,
    /// Contact email.
    pub email: String,
    /// Plantilla position or designation.
    pub position: Option<String>,
    /// Access level.
    pub role: UserRole,
    /// Profile image location.
    pub avatar_url: Option<String>,
    /// Deactivated accounts keep their rows for audit attribution.
    pub active: bool,
    /// Insertion timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl UserAccount {
    /// Applies a sparse patch and returns the changed field names.
    pub fn apply(&mut self, patch: UserAccountPatch, now: DateTime<Utc>) -> Vec<String> {
        let mut changed = Vec::new();
        apply_field(
            &mut self.display_name,
            patch.display_name,
            "displayName",
            &mut changed,
        );
        apply_field(&mut self.email, patch.email, "email", &mut changed);
        apply_field(&mut self.position, patch.position, "position", &mut changed);
        apply_field(&mut self.role, patch.role, "role", &mut changed);
        apply_field(
            &mut self.avatar_url,
            patch.avatar_url,
            "avatarUrl",
            &mut changed,
        );
        apply_field(&mut self.active, patch.active, "active", &mut changed);

        if !changed.is_empty() {
            self.updated_at = now;
        }

        changed
    }
}

/// Validated input for account creation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUserAccount {
    /// Name shown in the UI and in notification messages.
    pub display_name: String,
    /// Contact email.
    pub email: String,
    /// Plantilla position or designation.
    pub position: Option<String>,
    /// Access level.
    pub role: UserRole,
    /// Profile image location.
    pub avatar_url: Option<String>,
}

/// Sparse update payload for a user account.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserAccountPatch {
    /// New display name, when present.
    pub display_name: Option<String>,
    /// New email, when present.
    pub email: Option<String>,
    /// New position, when present.
    pub position: Option<Option<String>>,
    /// New role, when present.
    pub role: Option<UserRole>,
    /// New avatar location, when present.
    pub avatar_url: Option<Option<String>>,
    /// New active flag, when present.
    pub active: Option<bool>,
}
