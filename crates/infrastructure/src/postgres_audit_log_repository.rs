use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use setrack_application::{AuditLogEntry, AuditLogFilter, AuditLogRepository, AuditLogStats};
use setrack_core::{AppError, AppResult};

/// PostgreSQL-backed repository for audit log read models.
#[derive(Clone)]
pub struct PostgresAuditLogRepository {
    pool: PgPool,
}

impl PostgresAuditLogRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AuditLogRow {
    id: uuid::Uuid,
    user_id: Option<uuid::Uuid>,
    action: String,
    resource_type: String,
    resource_id: uuid::Uuid,
    resource_title: String,
    details: serde_json::Value,
    created_at: String,
}

#[derive(Debug, FromRow)]
struct AuditLogStatsRow {
    total: i64,
    today: i64,
    this_week: i64,
}

#[async_trait]
impl AuditLogRepository for PostgresAuditLogRepository {
    async fn list_entries(
        &self,
        filter: AuditLogFilter,
        limit: usize,
        offset: usize,
    ) -> AppResult<Vec<AuditLogEntry>> {
        let rows = sqlx::query_as::<_, AuditLogRow>(
            r#"
            SELECT
                id,
                user_id,
                action,
                resource_type,
                resource_id,
                resource_title,
                details,
                to_char(created_at AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at
            FROM audit_log
            WHERE ($1::UUID IS NULL OR user_id = $1)
                AND ($2::TEXT IS NULL OR action = $2)
                AND ($3::TEXT IS NULL
                    OR resource_title ILIKE '%' || $3 || '%'
                    OR resource_type ILIKE '%' || $3 || '%')
            ORDER BY created_at DESC
            LIMIT $4
            OFFSET $5
            "#,
        )
        .bind(filter.user_id.map(|user_id| user_id.as_uuid()))
        .bind(filter.action.map(|action| action.as_str()))
        .bind(filter.search)
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list audit log entries: {error}"))
        })?;

        Ok(rows
            .into_iter()
            .map(|row| AuditLogEntry {
                id: row.id.to_string(),
                user_id: row.user_id.map(|user_id| user_id.to_string()),
                action: row.action,
                resource_type: row.resource_type,
                resource_id: row.resource_id.to_string(),
                resource_title: row.resource_title,
                details: row.details,
                created_at: row.created_at,
            })
            .collect())
    }

    async fn count_stats(
        &self,
        filter: AuditLogFilter,
        today_start: DateTime<Utc>,
        week_start: DateTime<Utc>,
    ) -> AppResult<AuditLogStats> {
        let row = sqlx::query_as::<_, AuditLogStatsRow>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE created_at >= $4) AS today,
                COUNT(*) FILTER (WHERE created_at >= $5) AS this_week
            FROM audit_log
            WHERE ($1::UUID IS NULL OR user_id = $1)
                AND ($2::TEXT IS NULL OR action = $2)
                AND ($3::TEXT IS NULL
                    OR resource_title ILIKE '%' || $3 || '%'
                    OR resource_type ILIKE '%' || $3 || '%')
            "#,
        )
        .bind(filter.user_id.map(|user_id| user_id.as_uuid()))
        .bind(filter.action.map(|action| action.as_str()))
        .bind(filter.search)
        .bind(today_start)
        .bind(week_start)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to count audit log entries: {error}"))
        })?;

        Ok(AuditLogStats {
            total: row.total.max(0) as u64,
            today: row.today.max(0) as u64,
            this_week: row.this_week.max(0) as u64,
        })
    }
}
