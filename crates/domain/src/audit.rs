use std::str::FromStr;

use serde::{Deserialize, Serialize};
use setrack_core::AppError;

/// Action kinds recorded in the activity log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    /// A new entity was inserted.
    Created,
    /// An existing entity was modified.
    Updated,
    /// An entity was removed.
    Deleted,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "CREATE",
            Self::Updated => "UPDATE",
            Self::Deleted => "DELETE",
        }
    }
}

impl FromStr for AuditAction {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "CREATE" => Ok(Self::Created),
            "UPDATE" => Ok(Self::Updated),
            "DELETE" => Ok(Self::Deleted),
            _ => Err(AppError::Validation(format!(
                "unknown audit action '{value}'"
            ))),
        }
    }
}

/// Entity kinds an audit or notification record can concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceKind {
    /// A SETUP/CEST project.
    Project,
    /// A document attached to a project.
    Document,
    /// A calendar/booking event.
    Event,
    /// A map pin.
    Pin,
    /// A user account.
    User,
}

impl ResourceKind {
    /// Returns a stable storage value for this resource kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Project => "PROJECT",
            Self::Document => "DOCUMENT",
            Self::Event => "EVENT",
            Self::Pin => "PIN",
            Self::User => "USER",
        }
    }
}

impl FromStr for ResourceKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "PROJECT" => Ok(Self::Project),
            "DOCUMENT" => Ok(Self::Document),
            "EVENT" => Ok(Self::Event),
            "PIN" => Ok(Self::Pin),
            "USER" => Ok(Self::User),
            _ => Err(AppError::Validation(format!(
                "unknown resource kind '{value}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{AuditAction, ResourceKind};

    #[test]
    fn audit_action_roundtrip_storage_value() {
        for action in [
            AuditAction::Created,
            AuditAction::Updated,
            AuditAction::Deleted,
        ] {
            let restored = AuditAction::from_str(action.as_str());
            assert_eq!(restored.ok(), Some(action));
        }
    }

    #[test]
    fn unknown_action_is_rejected() {
        assert!(AuditAction::from_str("UPSERT").is_err());
    }

    #[test]
    fn resource_kind_roundtrip_storage_value() {
        let restored = ResourceKind::from_str(ResourceKind::Event.as_str());
        assert_eq!(restored.ok(), Some(ResourceKind::Event));
    }
}
