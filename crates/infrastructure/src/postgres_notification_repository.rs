use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use setrack_application::NotificationRepository;
use setrack_core::{AppError, AppResult, UserId};
use setrack_domain::{Notification, NotificationKind};

/// PostgreSQL-backed repository for notifications.
#[derive(Clone)]
pub struct PostgresNotificationRepository {
    pool: PgPool,
}

impl PostgresNotificationRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct NotificationRow {
    id: Uuid,
    user_id: Uuid,
    kind: String,
    title: String,
    message: String,
    event_id: Option<Uuid>,
    booked_by: Option<Uuid>,
    booked_by_name: Option<String>,
    booked_by_avatar_url: Option<String>,
    read: bool,
    created_at: DateTime<Utc>,
}

impl NotificationRow {
    fn into_notification(self) -> AppResult<Notification> {
        Ok(Notification {
            id: self.id,
            user_id: UserId::from_uuid(self.user_id),
            kind: NotificationKind::from_str(&self.kind)?,
            title: self.title,
            message: self.message,
            event_id: self.event_id,
            booked_by: self.booked_by.map(UserId::from_uuid),
            booked_by_name: self.booked_by_name,
            booked_by_avatar_url: self.booked_by_avatar_url,
            read: self.read,
            created_at: self.created_at,
        })
    }
}

#[async_trait]
impl NotificationRepository for PostgresNotificationRepository {
    async fn insert_many(&self, notifications: Vec<Notification>) -> AppResult<()> {
        for notification in notifications {
            sqlx::query(
                r#"
                INSERT INTO notifications (
                    id, user_id, kind, title, message, event_id,
                    booked_by, booked_by_name, booked_by_avatar_url,
                    read, created_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                "#,
            )
            .bind(notification.id)
            .bind(notification.user_id.as_uuid())
            .bind(notification.kind.as_str())
            .bind(notification.title)
            .bind(notification.message)
            .bind(notification.event_id)
            .bind(notification.booked_by.map(|user_id| user_id.as_uuid()))
            .bind(notification.booked_by_name)
            .bind(notification.booked_by_avatar_url)
            .bind(notification.read)
            .bind(notification.created_at)
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to insert notification: {error}"))
            })?;
        }

        Ok(())
    }

    async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<Notification>> {
        let rows = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT id, user_id, kind, title, message, event_id,
                booked_by, booked_by_name, booked_by_avatar_url,
                read, created_at
            FROM notifications
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list notifications: {error}")))?;

        rows.into_iter()
            .map(NotificationRow::into_notification)
            .collect()
    }

    async fn mark_read(&self, id: Uuid, user_id: UserId) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE notifications SET read = TRUE WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to mark notification read: {error}"))
        })?;

        Ok(result.rows_affected() > 0)
    }

    async fn mark_all_read(&self, user_id: UserId) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET read = TRUE WHERE user_id = $1 AND read = FALSE",
        )
        .bind(user_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to mark notifications read: {error}"))
        })?;

        Ok(result.rows_affected())
    }
}
