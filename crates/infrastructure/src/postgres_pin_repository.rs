use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use setrack_application::PinRepository;
use setrack_core::{AppError, AppResult};
use setrack_domain::MapPin;

/// PostgreSQL-backed repository for map pins.
#[derive(Clone)]
pub struct PostgresPinRepository {
    pool: PgPool,
}

impl PostgresPinRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PinRow {
    id: Uuid,
    label: String,
    latitude: f64,
    longitude: f64,
    project_id: Option<Uuid>,
    remarks: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PinRow> for MapPin {
    fn from(row: PinRow) -> Self {
        Self {
            id: row.id,
            label: row.label,
            latitude: row.latitude,
            longitude: row.longitude,
            project_id: row.project_id,
            remarks: row.remarks,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl PinRepository for PostgresPinRepository {
    async fn insert(&self, pin: MapPin) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO map_pins (
                id, label, latitude, longitude, project_id, remarks,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(pin.id)
        .bind(pin.label)
        .bind(pin.latitude)
        .bind(pin.longitude)
        .bind(pin.project_id)
        .bind(pin.remarks)
        .bind(pin.created_at)
        .bind(pin.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to insert pin: {error}")))?;

        Ok(())
    }

    async fn find(&self, id: Uuid) -> AppResult<Option<MapPin>> {
        let row = sqlx::query_as::<_, PinRow>(
            r#"
            SELECT id, label, latitude, longitude, project_id, remarks,
                created_at, updated_at
            FROM map_pins
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to fetch pin: {error}")))?;

        Ok(row.map(MapPin::from))
    }

    async fn list(&self) -> AppResult<Vec<MapPin>> {
        let rows = sqlx::query_as::<_, PinRow>(
            r#"
            SELECT id, label, latitude, longitude, project_id, remarks,
                created_at, updated_at
            FROM map_pins
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list pins: {error}")))?;

        Ok(rows.into_iter().map(MapPin::from).collect())
    }

    async fn update(&self, pin: MapPin) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE map_pins SET
                label = $2,
                latitude = $3,
                longitude = $4,
                project_id = $5,
                remarks = $6,
                updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(pin.id)
        .bind(pin.label)
        .bind(pin.latitude)
        .bind(pin.longitude)
        .bind(pin.project_id)
        .bind(pin.remarks)
        .bind(pin.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update pin: {error}")))?;

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM map_pins WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to delete pin: {error}")))?;

        Ok(())
    }
}
