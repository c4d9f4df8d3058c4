use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use setrack_core::UserId;
use setrack_domain::{CalendarEvent, CalendarEventPatch, NewCalendarEvent};
use uuid::Uuid;

use super::common::double_option;

/// Incoming payload for event creation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    #[serde(default)]
    pub staff_involved: Vec<Uuid>,
    pub assigned_personnel: Option<Uuid>,
}

impl From<CreateEventRequest> for NewCalendarEvent {
    fn from(value: CreateEventRequest) -> Self {
        Self {
            title: value.title,
            description: value.description,
            location: value.location,
            starts_at: value.starts_at,
            ends_at: value.ends_at,
            staff_involved: value.staff_involved.into_iter().map(UserId::from_uuid).collect(),
            assigned_personnel: value.assigned_personnel.map(UserId::from_uuid),
        }
    }
}

/// Incoming sparse payload for event updates.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub location: Option<Option<String>>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub staff_involved: Option<Vec<Uuid>>,
    #[serde(default, deserialize_with = "double_option")]
    pub assigned_personnel: Option<Option<Uuid>>,
}

impl From<UpdateEventRequest> for CalendarEventPatch {
    fn from(value: UpdateEventRequest) -> Self {
        Self {
            title: value.title,
            description: value.description,
            location: value.location,
            starts_at: value.starts_at,
            ends_at: value.ends_at,
            staff_involved: value
                .staff_involved
                .map(|staff| staff.into_iter().map(UserId::from_uuid).collect()),
            assigned_personnel: value
                .assigned_personnel
                .map(|assigned| assigned.map(UserId::from_uuid)),
        }
    }
}

/// Date-range filters accepted by the calendar listing endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventListQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// API representation of a calendar event.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub staff_involved: Vec<Uuid>,
    pub assigned_personnel: Option<Uuid>,
    pub booked_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CalendarEvent> for EventResponse {
    fn from(value: CalendarEvent) -> Self {
        Self {
            id: value.id,
            title: value.title,
            description: value.description,
            location: value.location,
            starts_at: value.starts_at,
            ends_at: value.ends_at,
            staff_involved: value
                .staff_involved
                .into_iter()
                .map(|user_id| user_id.as_uuid())
                .collect(),
            assigned_personnel: value.assigned_personnel.map(|user_id| user_id.as_uuid()),
            booked_by: value.booked_by.map(|user_id| user_id.as_uuid()),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}
