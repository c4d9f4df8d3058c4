use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use setrack_core::{AppError, AppResult, UserId};
use setrack_domain::{AuditAction, Document, DocumentPatch, NewDocument, ResourceKind};
use uuid::Uuid;

use crate::audit::AuditRecorder;
use crate::project_service::ProjectRepository;

/// Filters accepted by the document listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentListFilter {
    /// Restrict to one project's documents.
    pub project_id: Option<Uuid>,
    /// Case-insensitive substring match on title and category.
    pub search: Option<String>,
}

/// Repository port for project documents.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Inserts a new document row.
    async fn insert(&self, document: Document) -> AppResult<()>;

    /// Fetches one document by id.
    async fn find(&self, id: Uuid) -> AppResult<Option<Document>>;

    /// Lists documents matching the filter, newest first.
    async fn list(&self, filter: DocumentListFilter) -> AppResult<Vec<Document>>;

    /// Writes back a full document row.
    async fn update(&self, document: Document) -> AppResult<()>;

    /// Removes a document row.
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Application service for document records.
#[derive(Clone)]
pub struct DocumentService {
    repository: Arc<dyn DocumentRepository>,
    projects: Arc<dyn ProjectRepository>,
    audit: AuditRecorder,
}

impl DocumentService {
    /// Creates a service from its dependencies.
    #[must_use]
    pub fn new(
        repository: Arc<dyn DocumentRepository>,
        projects: Arc<dyn ProjectRepository>,
        audit: AuditRecorder,
    ) -> Self {
        Self {
            repository,
            projects,
            audit,
        }
    }

    /// Fetches one document or reports it missing.
    pub async fn get(&self, id: Uuid) -> AppResult<Document> {
        self.repository
            .find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("document '{id}' does not exist")))
    }

    /// Lists documents matching the filter.
    pub async fn list(&self, filter: DocumentListFilter) -> AppResult<Vec<Document>> {
        self.repository.list(filter).await
    }

    /// Creates a document after verifying the owning project exists.
    pub async fn create(&self, actor: Option<UserId>, input: NewDocument) -> AppResult<Document> {
        if input.title.trim().is_empty() {
            return Err(AppError::Validation("title must not be empty".to_owned()));
        }
        if input.file_name.trim().is_empty() {
            return Err(AppError::Validation(
                "file_name must not be empty".to_owned(),
            ));
        }
        if self.projects.find(input.project_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "project '{}' does not exist",
                input.project_id
            )));
        }

        let now = Utc::now();
        let document = Document {
            id: Uuid::new_v4(),
            project_id: input.project_id,
            title: input.title,
            category: input.category,
            file_name: input.file_name,
            remarks: input.remarks,
            created_at: now,
            updated_at: now,
        };
        self.repository.insert(document.clone()).await?;

        self.audit
            .record(
                actor,
                AuditAction::Created,
                ResourceKind::Document,
                document.id,
                document.title.clone(),
                json!({ "projectId": document.project_id, "category": document.category }),
            )
            .await;

        Ok(document)
    }

    /// Applies a sparse patch and records the changed fields.
    pub async fn update(
        &self,
        actor: Option<UserId>,
        id: Uuid,
        patch: DocumentPatch,
    ) -> AppResult<Document> {
        let mut document = self.get(id).await?;
        let changed = document.apply(patch, Utc::now());
        self.repository.update(document.clone()).await?;

        self.audit
            .record(
                actor,
                AuditAction::Updated,
                ResourceKind::Document,
                document.id,
                document.title.clone(),
                json!({ "changedFields": changed, "projectId": document.project_id }),
            )
            .await;

        Ok(document)
    }

    /// Deletes a document, capturing its audit snapshot first.
    pub async fn delete(&self, actor: Option<UserId>, id: Uuid) -> AppResult<()> {
        let document = self.get(id).await?;
        self.repository.delete(id).await?;

        self.audit
            .record(
                actor,
                AuditAction::Deleted,
                ResourceKind::Document,
                document.id,
                document.title,
                json!({ "projectId": document.project_id }),
            )
            .await;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::Utc;
    use setrack_core::{AppError, AppResult, UserId};
    use setrack_domain::{
        Document, NewDocument, Project, ProjectCode, ProjectStatus,
    };
    use tokio::sync::Mutex;
    use uuid::Uuid;

    use crate::audit::{AuditEvent, AuditRecorder, AuditRepository};
    use crate::project_service::{ProjectListFilter, ProjectRepository, StatusCount};

    use super::{DocumentListFilter, DocumentRepository, DocumentService};

    #[derive(Default)]
    struct FakeDocumentRepository {
        documents: Mutex<Vec<Document>>,
    }

    #[async_trait]
    impl DocumentRepository for FakeDocumentRepository {
        async fn insert(&self, document: Document) -> AppResult<()> {
            self.documents.lock().await.push(document);
            Ok(())
        }

        async fn find(&self, id: Uuid) -> AppResult<Option<Document>> {
            Ok(self
                .documents
                .lock()
                .await
                .iter()
                .find(|document| document.id == id)
                .cloned())
        }

        async fn list(&self, _filter: DocumentListFilter) -> AppResult<Vec<Document>> {
            Ok(self.documents.lock().await.clone())
        }

        async fn update(&self, document: Document) -> AppResult<()> {
            let mut documents = self.documents.lock().await;
            if let Some(stored) = documents.iter_mut().find(|stored| stored.id == document.id) {
                *stored = document;
            }
            Ok(())
        }

        async fn delete(&self, id: Uuid) -> AppResult<()> {
            self.documents
                .lock()
                .await
                .retain(|document| document.id != id);
            Ok(())
        }
    }

    struct SingleProjectRepository {
        project: Project,
    }

    #[async_trait]
    impl ProjectRepository for SingleProjectRepository {
        async fn insert(&self, _project: Project) -> AppResult<()> {
            Ok(())
        }

        async fn find(&self, id: Uuid) -> AppResult<Option<Project>> {
            Ok((self.project.id == id).then(|| self.project.clone()))
        }

        async fn list(&self, _filter: ProjectListFilter) -> AppResult<Vec<Project>> {
            Ok(vec![self.project.clone()])
        }

        async fn update(&self, _project: Project) -> AppResult<()> {
            Ok(())
        }

        async fn delete(&self, _id: Uuid) -> AppResult<()> {
            Ok(())
        }

        async fn count(&self) -> AppResult<u64> {
            Ok(1)
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

    fn sample_project() -> Project {
        let now = Utc::now();
        Project {
            id: Uuid::new_v4(),
            code: ProjectCode::assign(1),
            title: "Acme Upgrade".to_owned(),
            description: None,
            status: ProjectStatus::Ongoing,
            beneficiary: None,
            location: None,
            amount_granted: None,
            start_date: None,
            end_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn create_rejects_unknown_project() {
        let project = sample_project();
        let service = DocumentService::new(
            Arc::new(FakeDocumentRepository::default()),
            Arc::new(SingleProjectRepository { project }),
            AuditRecorder::new(Arc::new(RecordingAuditRepository::default())),
        );

        let result = service
            .create(
                Some(UserId::new()),
                NewDocument {
                    project_id: Uuid::new_v4(),
                    title: "Proposal".to_owned(),
                    category: "PROPOSAL".to_owned(),
                    file_name: "proposal.pdf".to_owned(),
                    remarks: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn create_records_audit_with_project_context() {
        let project = sample_project();
        let project_id = project.id;
        let audit_repository = Arc::new(RecordingAuditRepository::default());
        let service = DocumentService::new(
            Arc::new(FakeDocumentRepository::default()),
            Arc::new(SingleProjectRepository { project }),
            AuditRecorder::new(audit_repository.clone()),
        );

        let result = service
            .create(
                Some(UserId::new()),
                NewDocument {
                    project_id,
                    title: "Terminal Report".to_owned(),
                    category: "TERMINAL_REPORT".to_owned(),
                    file_name: "terminal.pdf".to_owned(),
                    remarks: None,
                },
            )
            .await;

        assert!(result.is_ok());
        let events = audit_repository.events.lock().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].details["projectId"], serde_json::json!(project_id));
    }
}
