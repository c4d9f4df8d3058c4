use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use setrack_core::{AppError, AppResult, UserId};
use setrack_domain::{
    AuditAction, NewProject, Project, ProjectCode, ProjectPatch, ProjectStatus, ResourceKind,
};
use uuid::Uuid;

use crate::audit::AuditRecorder;

/// Filters accepted by the project listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectListFilter {
    /// Case-insensitive substring match on title, code, and beneficiary.
    pub search: Option<String>,
    /// Restrict to one lifecycle status.
    pub status: Option<ProjectStatus>,
    /// Restrict to projects created within one calendar year (UTC bounds).
    pub year: Option<i32>,
    /// Narrow the year filter to one calendar month (1-12). Ignored
    /// without `year`.
    pub month: Option<u32>,
}

/// Count of projects in one lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCount {
    /// Lifecycle status.
    pub status: ProjectStatus,
    /// Number of projects in that status.
    pub count: u64,
}

/// Aggregate project counts for the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectStats {
    /// Projects overall.
    pub total: u64,
    /// Per-status breakdown.
    pub by_status: Vec<StatusCount>,
}

/// Repository port for projects.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Inserts a new project row.
    async fn insert(&self, project: Project) -> AppResult<()>;

    /// Fetches one project by id.
    async fn find(&self, id: Uuid) -> AppResult<Option<Project>>;

    /// Lists projects matching the filter, newest first.
    async fn list(&self, filter: ProjectListFilter) -> AppResult<Vec<Project>>;

    /// Writes back a full project row.
    async fn update(&self, project: Project) -> AppResult<()>;

    /// Removes a project row; dependent documents and pins cascade at the
    /// store level.
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Counts all projects.
    async fn count(&self) -> AppResult<u64>;

    /// Counts projects per lifecycle status.
    async fn status_counts(&self) -> AppResult<Vec<StatusCount>>;
}

/// Application service for project CRUD and the audit side effects that run
/// alongside it.
#[derive(Clone)]
pub struct ProjectService {
    repository: Arc<dyn ProjectRepository>,
    audit: AuditRecorder,
}

impl ProjectService {
    /// Creates a service from its dependencies.
    #[must_use]
    pub fn new(repository: Arc<dyn ProjectRepository>, audit: AuditRecorder) -> Self {
        Self { repository, audit }
    }

    /// Fetches one project or reports it missing.
    pub async fn get(&self, id: Uuid) -> AppResult<Project> {
        self.repository
            .find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("project '{id}' does not exist")))
    }

    /// Lists projects matching the filter.
    pub async fn list(&self, filter: ProjectListFilter) -> AppResult<Vec<Project>> {
        self.repository.list(filter).await
    }

    /// Returns aggregate counts for the dashboard.
    pub async fn stats(&self) -> AppResult<ProjectStats> {
        let total = self.repository.count().await?;
        let by_status = self.repository.status_counts().await?;
        Ok(ProjectStats { total, by_status })
    }

    /// Creates a project, assigning the next sequential display code.
    ///
    /// The code is derived from the current count + 1 and is not
    /// collision-free under concurrent creates.
    pub async fn create(&self, actor: Option<UserId>, input: NewProject) -> AppResult<Project> {
        if input.title.trim().is_empty() {
            return Err(AppError::Validation("title must not be empty".to_owned()));
        }

        let sequence = self.repository.count().await? + 1;
        let now = Utc::now();
        let project = Project {
            id: Uuid::new_v4(),
            code: ProjectCode::assign(sequence),
            title: input.title,
            description: input.description,
            status: input.status,
            beneficiary: input.beneficiary,
            location: input.location,
            amount_granted: input.amount_granted,
            start_date: input.start_date,
            end_date: input.end_date,
            created_at: now,
            updated_at: now,
        };
        self.repository.insert(project.clone()).await?;

        self.audit
            .record(
                actor,
                AuditAction::Created,
                ResourceKind::Project,
                project.id,
                project.title.clone(),
                json!({ "code": project.code.as_str() }),
            )
            .await;

        Ok(project)
    }

    /// Applies a sparse patch and records the changed fields.
    pub async fn update(
        &self,
        actor: Option<UserId>,
        id: Uuid,
        patch: ProjectPatch,
    ) -> AppResult<Project> {
        let mut project = self.get(id).await?;
        let changed = project.apply(patch, Utc::now());
        self.repository.update(project.clone()).await?;

        self.audit
            .record(
                actor,
                AuditAction::Updated,
                ResourceKind::Project,
                project.id,
                project.title.clone(),
                json!({
                    "changedFields": changed,
                    "code": project.code.as_str(),
                }),
            )
            .await;

        Ok(project)
    }

    /// Deletes a project, capturing its audit snapshot before the delete so
    /// the title survives the removal.
    pub async fn delete(&self, actor: Option<UserId>, id: Uuid) -> AppResult<()> {
        let project = self.get(id).await?;
        self.repository.delete(id).await?;

        self.audit
            .record(
                actor,
                AuditAction::Deleted,
                ResourceKind::Project,
                project.id,
                project.title,
                json!({ "code": project.code.as_str() }),
            )
            .await;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use setrack_core::{AppError, AppResult, UserId};
    use setrack_domain::{NewProject, Project, ProjectPatch, ProjectStatus};
    use tokio::sync::Mutex;
    use uuid::Uuid;

    use crate::audit::{AuditEvent, AuditRecorder, AuditRepository};

    use super::{ProjectListFilter, ProjectRepository, ProjectService, StatusCount};

    #[derive(Default)]
    struct FakeProjectRepository {
        projects: Mutex<Vec<Project>>,
    }

    #[async_trait]
    impl ProjectRepository for FakeProjectRepository {
        async fn insert(&self, project: Project) -> AppResult<()> {
            self.projects.lock().await.push(project);
            Ok(())
        }

        async fn find(&self, id: Uuid) -> AppResult<Option<Project>> {
            Ok(self
                .projects
                .lock()
                .await
                .iter()
                .find(|project| project.id == id)
                .cloned())
        }

        async fn list(&self, _filter: ProjectListFilter) -> AppResult<Vec<Project>> {
            Ok(self.projects.lock().await.clone())
        }

        async fn update(&self, project: Project) -> AppResult<()> {
            let mut projects = self.projects.lock().await;
            if let Some(stored) = projects.iter_mut().find(|stored| stored.id == project.id) {
                *stored = project;
            }
            Ok(())
        }

        async fn delete(&self, id: Uuid) -> AppResult<()> {
            self.projects.lock().await.retain(|project| project.id != id);
            Ok(())
        }

        async fn count(&self) -> AppResult<u64> {
            Ok(self.projects.lock().await.len() as u64)
        }

        async fn status_counts(&self) -> AppResult<Vec<StatusCount>> {
            Ok(Vec::new())
        }
    }

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

    fn service() -> (ProjectService, Arc<RecordingAuditRepository>) {
        let audit_repository = Arc::new(RecordingAuditRepository::default());
        let service = ProjectService::new(
            Arc::new(FakeProjectRepository::default()),
            AuditRecorder::new(audit_repository.clone()),
        );
        (service, audit_repository)
    }

    fn new_project(title: &str) -> NewProject {
        NewProject {
            title: title.to_owned(),
            description: None,
            status: ProjectStatus::Proposed,
            beneficiary: None,
            location: None,
            amount_granted: None,
            start_date: None,
            end_date: None,
        }
    }

    #[tokio::test]
    async fn create_assigns_first_sequential_code() {
        let (service, _) = service();

        let project = match service.create(Some(UserId::new()), new_project("Acme Upgrade")).await {
            Ok(project) => project,
            Err(error) => panic!("create failed: {error}"),
        };

        assert_eq!(project.code.as_str(), "SETUP-0001");
    }

    #[tokio::test]
    async fn create_rejects_blank_title_before_any_write() {
        let (service, audit_repository) = service();

        let result = service.create(Some(UserId::new()), new_project("   ")).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(audit_repository.events.lock().await.is_empty());
    }

    #[tokio::test]
    async fn update_records_changed_fields_and_title_snapshot() {
        let (service, audit_repository) = service();
        let actor = UserId::new();

        let Ok(project) = service.create(Some(actor), new_project("Acme Upgrade")).await else {
            panic!("create failed");
        };
        let result = service
            .update(
                Some(actor),
                project.id,
                ProjectPatch {
                    status: Some(ProjectStatus::Approved),
                    ..ProjectPatch::default()
                },
            )
            .await;

        assert!(result.is_ok());
        let events = audit_repository.events.lock().await;
        assert_eq!(events.len(), 2);
        let update_event = &events[1];
        assert_eq!(update_event.action.as_str(), "UPDATE");
        assert_eq!(update_event.resource_id, project.id);
        assert_eq!(update_event.resource_title, "Acme Upgrade");
        assert_eq!(
            update_event.details["changedFields"],
            serde_json::json!(["status"])
        );
    }

    #[tokio::test]
    async fn empty_patch_is_a_noop_with_no_changed_fields() {
        let (service, audit_repository) = service();
        let actor = UserId::new();

        let Ok(project) = service.create(Some(actor), new_project("Acme Upgrade")).await else {
            panic!("create failed");
        };
        let Ok(updated) = service
            .update(Some(actor), project.id, ProjectPatch::default())
            .await
        else {
            panic!("update failed");
        };

        assert_eq!(updated, project);
        let events = audit_repository.events.lock().await;
        assert_eq!(events[1].details["changedFields"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn delete_snapshots_title_before_removal() {
        let (service, audit_repository) = service();
        let actor = UserId::new();

        let Ok(project) = service.create(Some(actor), new_project("Acme Upgrade")).await else {
            panic!("create failed");
        };
        let result = service.delete(Some(actor), project.id).await;
        assert!(result.is_ok());

        let events = audit_repository.events.lock().await;
        let delete_event = &events[1];
        assert_eq!(delete_event.action.as_str(), "DELETE");
        assert_eq!(delete_event.resource_title, "Acme Upgrade");

        let lookup = service.get(project.id).await;
        assert!(matches!(lookup, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn audit_failure_does_not_fail_the_mutation() {
        let service = ProjectService::new(
            Arc::new(FakeProjectRepository::default()),
            AuditRecorder::new(Arc::new(FailingAuditRepository)),
        );
        let actor = UserId::new();

        let Ok(project) = service.create(Some(actor), new_project("Acme Upgrade")).await else {
            panic!("create failed");
        };
        let result = service
            .update(
                Some(actor),
                project.id,
                ProjectPatch {
                    status: Some(ProjectStatus::Ongoing),
                    ..ProjectPatch::default()
                },
            )
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn mutations_without_actor_skip_audit() {
        let (service, audit_repository) = service();

        let Ok(project) = service.create(None, new_project("Acme Upgrade")).await else {
            panic!("create failed");
        };
        service
            .update(None, project.id, ProjectPatch::default())
            .await
            .ok();
        service.delete(None, project.id).await.ok();

        assert!(audit_repository.events.lock().await.is_empty());
    }

    #[tokio::test]
    async fn update_missing_project_is_not_found() {
        let (service, _) = service();

        let result = service
            .update(Some(UserId::new()), Uuid::new_v4(), ProjectPatch::default())
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
