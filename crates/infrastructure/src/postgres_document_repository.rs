use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use setrack_application::{DocumentListFilter, DocumentRepository};
use setrack_core::{AppError, AppResult};
use setrack_domain::Document;

/// PostgreSQL-backed repository for project documents.
#[derive(Clone)]
pub struct PostgresDocumentRepository {
    pool: PgPool,
}

impl PostgresDocumentRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct DocumentRow {
    id: Uuid,
    project_id: Uuid,
    title: String,
    category: String,
    file_name: String,
    remarks: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        Self {
            id: row.id,
            project_id: row.project_id,
            title: row.title,
            category: row.category,
            file_name: row.file_name,
            remarks: row.remarks,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl DocumentRepository for PostgresDocumentRepository {
    async fn insert(&self, document: Document) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO documents (
                id, project_id, title, category, file_name, remarks,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(document.id)
        .bind(document.project_id)
        .bind(document.title)
        .bind(document.category)
        .bind(document.file_name)
        .bind(document.remarks)
        .bind(document.created_at)
        .bind(document.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to insert document: {error}")))?;

        Ok(())
    }

    async fn find(&self, id: Uuid) -> AppResult<Option<Document>> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, project_id, title, category, file_name, remarks,
                created_at, updated_at
            FROM documents
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to fetch document: {error}")))?;

        Ok(row.map(Document::from))
    }

    async fn list(&self, filter: DocumentListFilter) -> AppResult<Vec<Document>> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, project_id, title, category, file_name, remarks,
                created_at, updated_at
            FROM documents
            WHERE ($1::UUID IS NULL OR project_id = $1)
                AND ($2::TEXT IS NULL
                    OR title ILIKE '%' || $2 || '%'
                    OR category ILIKE '%' || $2 || '%')
            ORDER BY created_at DESC
            "#,
        )
        .bind(filter.project_id)
        .bind(filter.search)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list documents: {error}")))?;

        Ok(rows.into_iter().map(Document::from).collect())
    }

    async fn update(&self, document: Document) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE documents SET
                title = $2,
                category = $3,
                file_name = $4,
                remarks = $5,
                updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(document.id)
        .bind(document.title)
        .bind(document.category)
        .bind(document.file_name)
        .bind(document.remarks)
        .bind(document.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update document: {error}")))?;

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to delete document: {error}")))?;

        Ok(())
    }
}
