use chrono::{DateTime, Utc};
use serde::Serialize;
use setrack_application::NotificationFeedItem;
use uuid::Uuid;

/// API representation of a notification with its relative-time label.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: Uuid,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub event_id: Option<Uuid>,
    pub booked_by: Option<Uuid>,
    pub booked_by_name: Option<String>,
    pub booked_by_avatar_url: Option<String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
    pub relative_time: String,
}

impl From<NotificationFeedItem> for NotificationResponse {
    fn from(value: NotificationFeedItem) -> Self {
        let notification = value.notification;
        Self {
            id: notification.id,
            kind: notification.kind.as_str().to_owned(),
            title: notification.title,
            message: notification.message,
            event_id: notification.event_id,
            booked_by: notification.booked_by.map(|user_id| user_id.as_uuid()),
            booked_by_name: notification.booked_by_name,
            booked_by_avatar_url: notification.booked_by_avatar_url,
            read: notification.read,
            created_at: notification.created_at,
            relative_time: value.relative_time,
        }
    }
}

/// Payload returned by the bulk mark-read endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAllReadResponse {
    pub updated: u64,
}
