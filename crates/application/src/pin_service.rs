use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use setrack_core::{AppError, AppResult, UserId};
use setrack_domain::{AuditAction, MapPin, MapPinPatch, NewMapPin, ResourceKind};
use uuid::Uuid;

use crate::audit::AuditRecorder;

/// Repository port for map pins.
#[async_trait]
pub trait PinRepository: Send + Sync {
    /// Inserts a new pin row.
    async fn insert(&self, pin: MapPin) -> AppResult<()>;

    /// Fetches one pin by id.
    async fn find(&self, id: Uuid) -> AppResult<Option<MapPin>>;

    /// Lists all pins, newest first.
    async fn list(&self) -> AppResult<Vec<MapPin>>;

    /// Writes back a full pin row.
    async fn update(&self, pin: MapPin) -> AppResult<()>;

    /// Removes a pin row.
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Application service for map pins.
#[derive(Clone)]
pub struct PinService {
    repository: Arc<dyn PinRepository>,
    audit: AuditRecorder,
}

impl PinService {
    /// Creates a service from its dependencies.
    #[must_use]
    pub fn new(repository: Arc<dyn PinRepository>, audit: AuditRecorder) -> Self {
        Self { repository, audit }
    }

    /// Fetches one pin or reports it missing.
    pub async fn get(&self, id: Uuid) -> AppResult<MapPin> {
        self.repository
            .find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("pin '{id}' does not exist")))
    }

    /// Lists all pins.
    pub async fn list(&self) -> AppResult<Vec<MapPin>> {
        self.repository.list().await
    }

    /// Creates a pin after validating its coordinates.
    pub async fn create(&self, actor: Option<UserId>, input: NewMapPin) -> AppResult<MapPin> {
        if input.label.trim().is_empty() {
            return Err(AppError::Validation("label must not be empty".to_owned()));
        }
        if !(-90.0..=90.0).contains(&input.latitude) {
            return Err(AppError::Validation(format!(
                "latitude {} is out of range",
                input.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&input.longitude) {
            return Err(AppError::Validation(format!(
                "longitude {} is out of range",
                input.longitude
            )));
        }

        let now = Utc::now();
        let pin = MapPin {
            id: Uuid::new_v4(),
            label: input.label,
            latitude: input.latitude,
            longitude: input.longitude,
            project_id: input.project_id,
            remarks: input.remarks,
            created_at: now,
            updated_at: now,
        };
        self.repository.insert(pin.clone()).await?;

        self.audit
            .record(
                actor,
                AuditAction::Created,
                ResourceKind::Pin,
                pin.id,
                pin.label.clone(),
                json!({ "latitude": pin.latitude, "longitude": pin.longitude }),
            )
            .await;

        Ok(pin)
    }

    /// Applies a sparse patch and records the changed fields.
    pub async fn update(
        &self,
        actor: Option<UserId>,
        id: Uuid,
        patch: MapPinPatch,
    ) -> AppResult<MapPin> {
        let mut pin = self.get(id).await?;
        let changed = pin.apply(patch, Utc::now());
        self.repository.update(pin.clone()).await?;

        self.audit
            .record(
                actor,
                AuditAction::Updated,
                ResourceKind::Pin,
                pin.id,
                pin.label.clone(),
                json!({ "changedFields": changed }),
            )
            .await;

        Ok(pin)
    }

    /// Deletes a pin, capturing its audit snapshot first.
    pub async fn delete(&self, actor: Option<UserId>, id: Uuid) -> AppResult<()> {
        let pin = self.get(id).await?;
        self.repository.delete(id).await?;

        self.audit
            .record(
                actor,
                AuditAction::Deleted,
                ResourceKind::Pin,
                pin.id,
                pin.label,
                json!({ "latitude": pin.latitude, "longitude": pin.longitude }),
            )
            .await;

        Ok(())
    }
}
