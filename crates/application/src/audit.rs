use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use setrack_core::{AppResult, UserId};
use setrack_domain::{AuditAction, ResourceKind};
use tracing::warn;
use uuid::Uuid;

/// Immutable audit event payload emitted after a successful primary mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEvent {
    /// Actor attributed to the mutation.
    pub user_id: UserId,
    /// Action kind.
    pub action: AuditAction,
    /// Kind of the mutated entity.
    pub resource_kind: ResourceKind,
    /// Identifier of the mutated entity.
    pub resource_id: Uuid,
    /// Human-readable label captured at the time of the action, never
    /// recomputed from the live entity.
    pub resource_title: String,
    /// Structured context, e.g. changed field names and a project code.
    pub details: Value,
}

/// Port for persisting append-only audit events.
#[async_trait]
pub trait AuditRepository: Send + Sync {
    /// Persists one audit event.
    async fn append_event(&self, event: AuditEvent) -> AppResult<()>;
}

/// Best-effort audit trail writer.
///
/// Recording never returns an error to the caller: a failed insert is
/// reported through logging only and the primary mutation stands. When no
/// actor is resolvable the entry is silently skipped.
#[derive(Clone)]
pub struct AuditRecorder {
    repository: Arc<dyn AuditRepository>,
}

impl AuditRecorder {
    /// Creates a recorder backed by the given repository.
    #[must_use]
    pub fn new(repository: Arc<dyn AuditRepository>) -> Self {
        Self { repository }
    }

    /// Appends one audit entry describing a completed mutation.
    pub async fn record(
        &self,
        actor: Option<UserId>,
        action: AuditAction,
        resource_kind: ResourceKind,
        resource_id: Uuid,
        resource_title: impl Into<String>,
        details: Value,
    ) {
        let Some(user_id) = actor else {
            return;
        };

        let event = AuditEvent {
            user_id,
            action,
            resource_kind,
            resource_id,
            resource_title: resource_title.into(),
            details,
        };

        if let Err(error) = self.repository.append_event(event).await {
            warn!(
                error = %error,
                action = action.as_str(),
                resource_kind = resource_kind.as_str(),
                resource_id = %resource_id,
                "failed to append audit event"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::json;
    use setrack_core::{AppError, AppResult, UserId};
    use setrack_domain::{AuditAction, ResourceKind};
    use tokio::sync::Mutex;
    use uuid::Uuid;

    use super::{AuditEvent, AuditRecorder, AuditRepository};

    #[derive(Default)]
    struct RecordingAuditRepository {
        events: Mutex<Vec<AuditEvent>>,
    }

    #[async_trait]
    impl AuditRepository for RecordingAuditRepository {
        async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
            self.events.lock().await.push(event);
            Ok(())
        }
    }

    struct FailingAuditRepository;

    #[async_trait]
    impl AuditRepository for FailingAuditRepository {
        async fn append_event(&self, _event: AuditEvent) -> AppResult<()> {
            Err(AppError::Internal("audit store unavailable".to_owned()))
        }
    }

    #[tokio::test]
    async fn record_appends_event_for_identified_actor() {
        let repository = Arc::new(RecordingAuditRepository::default());
        let recorder = AuditRecorder::new(repository.clone());

        recorder
            .record(
                Some(UserId::new()),
                AuditAction::Updated,
                ResourceKind::Project,
                Uuid::new_v4(),
                "Acme Upgrade",
                json!({"changedFields": ["status"]}),
            )
            .await;

        let events = repository.events.lock().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].resource_title, "Acme Upgrade");
    }

    #[tokio::test]
    async fn record_skips_silently_without_actor() {
        let repository = Arc::new(RecordingAuditRepository::default());
        let recorder = AuditRecorder::new(repository.clone());

        recorder
            .record(
                None,
                AuditAction::Created,
                ResourceKind::Project,
                Uuid::new_v4(),
                "Acme Upgrade",
                json!({}),
            )
            .await;

        assert!(repository.events.lock().await.is_empty());
    }

    #[tokio::test]
    async fn record_swallows_repository_failure() {
        let recorder = AuditRecorder::new(Arc::new(FailingAuditRepository));

        recorder
            .record(
                Some(UserId::new()),
                AuditAction::Deleted,
                ResourceKind::Event,
                Uuid::new_v4(),
                "Quarterly Review",
                json!({}),
            )
            .await;
    }
}
