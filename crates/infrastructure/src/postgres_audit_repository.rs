use async_trait::async_trait;
use sqlx::PgPool;

use setrack_application::{AuditEvent, AuditRepository};
use setrack_core::{AppError, AppResult};

/// PostgreSQL-backed append-only audit repository.
#[derive(Clone)]
pub struct PostgresAuditRepository {
    pool: PgPool,
}

impl PostgresAuditRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditRepository for PostgresAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO audit_log (
                user_id,
                action,
                resource_type,
                resource_id,
                resource_title,
                details
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(event.user_id.as_uuid())
        .bind(event.action.as_str())
        .bind(event.resource_kind.as_str())
        .bind(event.resource_id)
        .bind(event.resource_title)
        .bind(event.details)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to append audit event: {error}")))?;

        Ok(())
    }
}
