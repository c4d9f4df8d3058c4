use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use setrack_application::{EventListFilter, EventRepository};
use setrack_core::{AppError, AppResult, UserId};
use setrack_domain::CalendarEvent;

/// PostgreSQL-backed repository for calendar events.
#[derive(Clone)]
pub struct PostgresEventRepository {
    pool: PgPool,
}

impl PostgresEventRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct EventRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    location: Option<String>,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    staff_involved: Vec<Uuid>,
    assigned_personnel: Option<Uuid>,
    booked_by: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<EventRow> for CalendarEvent {
    fn from(row: EventRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            location: row.location,
            starts_at: row.starts_at,
            ends_at: row.ends_at,
            staff_involved: row.staff_involved.into_iter().map(UserId::from_uuid).collect(),
            assigned_personnel: row.assigned_personnel.map(UserId::from_uuid),
            booked_by: row.booked_by.map(UserId::from_uuid),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn staff_uuids(staff: &[UserId]) -> Vec<Uuid> {
    staff.iter().map(UserId::as_uuid).collect()
}

const EVENT_COLUMNS: &str = r#"
    id,
    title,
    description,
    location,
    starts_at,
    ends_at,
    staff_involved,
    assigned_personnel,
    booked_by,
    created_at,
    updated_at
"#;

#[async_trait]
impl EventRepository for PostgresEventRepository {
    async fn insert(&self, event: CalendarEvent) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO calendar_events (
                id, title, description, location, starts_at, ends_at,
                staff_involved, assigned_personnel, booked_by,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(event.id)
        .bind(event.title)
        .bind(event.description)
        .bind(event.location)
        .bind(event.starts_at)
        .bind(event.ends_at)
        .bind(staff_uuids(&event.staff_involved))
        .bind(event.assigned_personnel.map(|user_id| user_id.as_uuid()))
        .bind(event.booked_by.map(|user_id| user_id.as_uuid()))
        .bind(event.created_at)
        .bind(event.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to insert event: {error}")))?;

        Ok(())
    }

    async fn find(&self, id: Uuid) -> AppResult<Option<CalendarEvent>> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM calendar_events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to fetch event: {error}")))?;

        Ok(row.map(CalendarEvent::from))
    }

    async fn list(&self, filter: EventListFilter) -> AppResult<Vec<CalendarEvent>> {
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM calendar_events
            WHERE ($1::TIMESTAMPTZ IS NULL OR ends_at >= $1)
                AND ($2::TIMESTAMPTZ IS NULL OR starts_at < $2)
            ORDER BY starts_at
            "#
        ))
        .bind(filter.from)
        .bind(filter.to)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list events: {error}")))?;

        Ok(rows.into_iter().map(CalendarEvent::from).collect())
    }

    async fn update(&self, event: CalendarEvent) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE calendar_events SET
                title = $2,
                description = $3,
                location = $4,
                starts_at = $5,
                ends_at = $6,
                staff_involved = $7,
                assigned_personnel = $8,
                updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(event.id)
        .bind(event.title)
        .bind(event.description)
        .bind(event.location)
        .bind(event.starts_at)
        .bind(event.ends_at)
        .bind(staff_uuids(&event.staff_involved))
        .bind(event.assigned_personnel.map(|user_id| user_id.as_uuid()))
        .bind(event.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update event: {error}")))?;

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM calendar_events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to delete event: {error}")))?;

        Ok(())
    }
}
