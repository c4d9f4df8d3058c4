use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use setrack_core::{AppError, UserId};
use uuid::Uuid;

/// Categories of user-facing notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationKind {
    /// The recipient was added to a calendar event's staffing.
    EventMention,
}

impl NotificationKind {
    /// Returns a stable storage value for this kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EventMention => "event-mention",
        }
    }
}

impl FromStr for NotificationKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "event-mention" => Ok(Self::EventMention),
            _ => Err(AppError::Validation(format!(
                "unknown notification kind '{value}'"
            ))),
        }
    }
}

/// A per-recipient notification row.
///
/// Rows are bulk-inserted when a mutation exposes new users to a shared
/// resource and are only ever mutated to flip `read`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Stable identifier.
    pub id: Uuid,
    /// Recipient.
    pub user_id: UserId,
    /// Notification category.
    pub kind: NotificationKind,
    /// Short headline.
    pub title: String,
    /// Rendered message body.
    pub message: String,
    /// Back-reference to the originating event, when applicable.
    pub event_id: Option<Uuid>,
    /// User whose action produced the notification.
    pub booked_by: Option<UserId>,
    /// Display name of that user, captured at emission time.
    pub booked_by_name: Option<String>,
    /// Avatar of that user, captured at emission time.
    pub booked_by_avatar_url: Option<String>,
    /// Whether the recipient opened the notification.
    pub read: bool,
    /// Insertion timestamp.
    pub created_at: DateTime<Utc>,
}
