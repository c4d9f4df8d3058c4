use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use setrack_application::{ProjectListFilter, ProjectRepository, StatusCount};
use setrack_core::{AppError, AppResult};
use setrack_domain::{Project, ProjectCode, ProjectStatus, month_bounds, year_bounds};

/// PostgreSQL-backed repository for projects.
#[derive(Clone)]
pub struct PostgresProjectRepository {
    pool: PgPool,
}

impl PostgresProjectRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ProjectRow {
    id: Uuid,
    code: String,
    title: String,
    description: Option<String>,
    status: String,
    beneficiary: Option<String>,
    location: Option<String>,
    amount_granted: Option<i64>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProjectRow {
    fn into_project(self) -> AppResult<Project> {
        Ok(Project {
            id: self.id,
            code: ProjectCode::parse(&self.code)?,
            title: self.title,
            description: self.description,
            status: ProjectStatus::from_str(&self.status)?,
            beneficiary: self.beneficiary,
            location: self.location,
            amount_granted: self.amount_granted,
            start_date: self.start_date,
            end_date: self.end_date,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const PROJECT_COLUMNS: &str = r#"
    id,
    code,
    title,
    description,
    status,
    beneficiary,
    location,
    amount_granted,
    start_date,
    end_date,
    created_at,
    updated_at
"#;

#[async_trait]
impl ProjectRepository for PostgresProjectRepository {
    async fn insert(&self, project: Project) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO projects (
                id, code, title, description, status, beneficiary,
                location, amount_granted, start_date, end_date,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(project.id)
        .bind(project.code.as_str())
        .bind(project.title)
        .bind(project.description)
        .bind(project.status.as_str())
        .bind(project.beneficiary)
        .bind(project.location)
        .bind(project.amount_granted)
        .bind(project.start_date)
        .bind(project.end_date)
        .bind(project.created_at)
        .bind(project.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to insert project: {error}")))?;

        Ok(())
    }

    async fn find(&self, id: Uuid) -> AppResult<Option<Project>> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to fetch project: {error}")))?;

        row.map(ProjectRow::into_project).transpose()
    }

    async fn list(&self, filter: ProjectListFilter) -> AppResult<Vec<Project>> {
        let window = match (filter.year, filter.month) {
            (Some(year), Some(month)) => Some(month_bounds(year, month)?),
            (Some(year), None) => Some(year_bounds(year)?),
            (None, _) => None,
        };
        let (created_from, created_until) = match window {
            Some((start, end)) => (Some(start), Some(end)),
            None => (None, None),
        };

        let rows = sqlx::query_as::<_, ProjectRow>(&format!(
            r#"
            SELECT {PROJECT_COLUMNS}
            FROM projects
            WHERE ($1::TEXT IS NULL
                    OR title ILIKE '%' || $1 || '%'
                    OR code ILIKE '%' || $1 || '%'
                    OR beneficiary ILIKE '%' || $1 || '%')
                AND ($2::TEXT IS NULL OR status = $2)
                AND ($3::TIMESTAMPTZ IS NULL OR created_at >= $3)
                AND ($4::TIMESTAMPTZ IS NULL OR created_at < $4)
            ORDER BY created_at DESC
            "#
        ))
        .bind(filter.search)
        .bind(filter.status.map(|status| status.as_str()))
        .bind(created_from)
        .bind(created_until)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list projects: {error}")))?;

        rows.into_iter().map(ProjectRow::into_project).collect()
    }

    async fn update(&self, project: Project) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE projects SET
                title = $2,
                description = $3,
                status = $4,
                beneficiary = $5,
                location = $6,
                amount_granted = $7,
                start_date = $8,
                end_date = $9,
                updated_at = $10
            WHERE id = $1
            "#,
        )
        .bind(project.id)
        .bind(project.title)
        .bind(project.description)
        .bind(project.status.as_str())
        .bind(project.beneficiary)
        .bind(project.location)
        .bind(project.amount_granted)
        .bind(project.start_date)
        .bind(project.end_date)
        .bind(project.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update project: {error}")))?;

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to delete project: {error}")))?;

        Ok(())
    }

    async fn count(&self) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM projects")
            .fetch_one(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to count projects: {error}")))?;

        Ok(count.max(0) as u64)
    }

    async fn status_counts(&self) -> AppResult<Vec<StatusCount>> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM projects GROUP BY status")
                .fetch_all(&self.pool)
                .await
                .map_err(|error| {
                    AppError::Internal(format!("failed to count projects by status: {error}"))
                })?;

        rows.into_iter()
            .map(|(status, count)| {
                Ok(StatusCount {
                    status: ProjectStatus::from_str(&status)?,
                    count: count.max(0) as u64,
                })
            })
            .collect()
    }
}
