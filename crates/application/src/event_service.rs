use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use setrack_core::{AppError, AppResult, UserId};
use setrack_domain::{
    AuditAction, CalendarEvent, CalendarEventPatch, NewCalendarEvent, ResourceKind,
    staffing_additions,
};
use tracing::warn;
use uuid::Uuid;

use crate::audit::AuditRecorder;
use crate::notification_service::NotificationService;

/// Date-range filter for the calendar listing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EventListFilter {
    /// Keep events ending at or after this instant.
    pub from: Option<DateTime<Utc>>,
    /// Keep events starting before this instant.
    pub to: Option<DateTime<Utc>>,
}

/// Repository port for calendar events.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Inserts a new event row.
    async fn insert(&self, event: CalendarEvent) -> AppResult<()>;

    /// Fetches one event by id.
    async fn find(&self, id: Uuid) -> AppResult<Option<CalendarEvent>>;

    /// Lists events overlapping the filter window, soonest first.
    async fn list(&self, filter: EventListFilter) -> AppResult<Vec<CalendarEvent>>;

    /// Writes back a full event row.
    async fn update(&self, event: CalendarEvent) -> AppResult<()>;

    /// Removes an event row.
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Application service for calendar events.
///
/// Staffing changes feed the notification emitter: users newly exposed to
/// an event are notified, best-effort, after the primary write succeeds.
#[derive(Clone)]
pub struct EventService {
    repository: Arc<dyn EventRepository>,
    audit: AuditRecorder,
    notifications: NotificationService,
}

impl EventService {
    /// Creates a service from its dependencies.
    #[must_use]
    pub fn new(
        repository: Arc<dyn EventRepository>,
        audit: AuditRecorder,
        notifications: NotificationService,
    ) -> Self {
        Self {
            repository,
            audit,
            notifications,
        }
    }

    /// Fetches one event or reports it missing.
    pub async fn get(&self, id: Uuid) -> AppResult<CalendarEvent> {
        self.repository
            .find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("event '{id}' does not exist")))
    }

    /// Lists events overlapping the filter window.
    pub async fn list(&self, filter: EventListFilter) -> AppResult<Vec<CalendarEvent>> {
        self.repository.list(filter).await
    }

    /// Creates an event and notifies its initial staffing.
    pub async fn create(
        &self,
        actor: Option<UserId>,
        input: NewCalendarEvent,
    ) -> AppResult<CalendarEvent> {
        if input.title.trim().is_empty() {
            return Err(AppError::Validation("title must not be empty".to_owned()));
        }
        if input.ends_at <= input.starts_at {
            return Err(AppError::Validation(
                "ends_at must be after starts_at".to_owned(),
            ));
        }

        let now = Utc::now();
        let event = CalendarEvent {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            location: input.location,
            starts_at: input.starts_at,
            ends_at: input.ends_at,
            staff_involved: input.staff_involved,
            assigned_personnel: input.assigned_personnel,
            booked_by: actor,
            created_at: now,
            updated_at: now,
        };
        self.repository.insert(event.clone()).await?;

        self.audit
            .record(
                actor,
                AuditAction::Created,
                ResourceKind::Event,
                event.id,
                event.title.clone(),
                json!({ "startsAt": event.starts_at.to_rfc3339() }),
            )
            .await;

        let mut recipients = staffing_additions(&[], &event.staff_involved);
        if let Some(assigned) = event.assigned_personnel {
            if !recipients.contains(&assigned) {
                recipients.push(assigned);
            }
        }
        self.notify_best_effort(actor, &event, &recipients).await;

        Ok(event)
    }

    /// Applies a sparse patch; newly added staff are notified.
    pub async fn update(
        &self,
        actor: Option<UserId>,
        id: Uuid,
        patch: CalendarEventPatch,
    ) -> AppResult<CalendarEvent> {
        let mut event = self.get(id).await?;
        let before_staff = event.staff_involved.clone();
        let before_assigned = event.assigned_personnel;

        let changed = event.apply(patch, Utc::now());
        self.repository.update(event.clone()).await?;

        self.audit
            .record(
                actor,
                AuditAction::Updated,
                ResourceKind::Event,
                event.id,
                event.title.clone(),
                json!({ "changedFields": changed }),
            )
            .await;

        let mut recipients = staffing_additions(&before_staff, &event.staff_involved);
        if let Some(assigned) = event.assigned_personnel {
            if before_assigned != Some(assigned) && !recipients.contains(&assigned) {
                recipients.push(assigned);
            }
        }
        self.notify_best_effort(actor, &event, &recipients).await;

        Ok(event)
    }

    /// Deletes an event, capturing its audit snapshot first.
    pub async fn delete(&self, actor: Option<UserId>, id: Uuid) -> AppResult<()> {
        let event = self.get(id).await?;
        self.repository.delete(id).await?;

        self.audit
            .record(
                actor,
                AuditAction::Deleted,
                ResourceKind::Event,
                event.id,
                event.title,
                json!({ "startsAt": event.starts_at.to_rfc3339() }),
            )
            .await;

        Ok(())
    }

    /// Emits staffing notifications without letting a failure reach the
    /// caller. Without an actor the side effect is skipped entirely.
    async fn notify_best_effort(
        &self,
        actor: Option<UserId>,
        event: &CalendarEvent,
        recipients: &[UserId],
    ) {
        let Some(actor) = actor else {
            return;
        };

        if let Err(error) = self
            .notifications
            .notify_event_staffing(actor, event, recipients)
            .await
        {
            warn!(
                error = %error,
                event_id = %event.id,
                recipients = recipients.len(),
                "staffing notification emission failed after event mutation"
            );
        }
    }
}
