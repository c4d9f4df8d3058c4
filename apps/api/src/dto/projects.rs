use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use setrack_core::AppResult;
use setrack_domain::{NewProject, Project, ProjectPatch, ProjectStatus};
use uuid::Uuid;

use super::common::double_option;

/// Incoming payload for project creation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub beneficiary: Option<String>,
    pub location: Option<String>,
    pub amount_granted: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl CreateProjectRequest {
    /// Converts the request into a validated creation input.
    pub fn into_input(self) -> AppResult<NewProject> {
        let status = match self.status {
            Some(value) => ProjectStatus::from_str(&value)?,
            None => ProjectStatus::Proposed,
        };

        Ok(NewProject {
            title: self.title,
            description: self.description,
            status,
            beneficiary: self.beneficiary,
            location: self.location,
            amount_granted: self.amount_granted,
            start_date: self.start_date,
            end_date: self.end_date,
        })
    }
}

/// Incoming sparse payload for project updates. Absent fields are left
/// untouched; explicit nulls clear nullable fields.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub beneficiary: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub location: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub amount_granted: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub start_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub end_date: Option<Option<NaiveDate>>,
}

impl UpdateProjectRequest {
    /// Converts the request into a domain patch.
    pub fn into_patch(self) -> AppResult<ProjectPatch> {
        let status = self
            .status
            .map(|value| ProjectStatus::from_str(&value))
            .transpose()?;

        Ok(ProjectPatch {
            title: self.title,
            description: self.description,
            status,
            beneficiary: self.beneficiary,
            location: self.location,
            amount_granted: self.amount_granted,
            start_date: self.start_date,
            end_date: self.end_date,
        })
    }
}

/// Filters accepted by the project listing endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectListQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub year: Option<i32>,
    pub month: Option<u32>,
}

/// API representation of a project.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    pub id: Uuid,
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub beneficiary: Option<String>,
    pub location: Option<String>,
    pub amount_granted: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Project> for ProjectResponse {
    fn from(value: Project) -> Self {
        Self {
            id: value.id,
            code: value.code.as_str().to_owned(),
            title: value.title,
            description: value.description,
            status: value.status.as_str().to_owned(),
            beneficiary: value.beneficiary,
            location: value.location,
            amount_granted: value.amount_granted,
            start_date: value.start_date,
            end_date: value.end_date,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// API representation of one status bucket.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCountResponse {
    pub status: String,
    pub count: u64,
}

/// API representation of dashboard project counts.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStatsResponse {
    pub total: u64,
    pub by_status: Vec<StatusCountResponse>,
}

impl From<setrack_application::ProjectStats> for ProjectStatsResponse {
    fn from(value: setrack_application::ProjectStats) -> Self {
        Self {
            total: value.total,
            by_status: value
                .by_status
                .into_iter()
                .map(|bucket| StatusCountResponse {
                    status: bucket.status.as_str().to_owned(),
                    count: bucket.count,
                })
                .collect(),
        }
    }
}

/// Parses the optional status filter of the listing endpoint.
pub fn parse_status_filter(status: Option<String>) -> AppResult<Option<ProjectStatus>> {
    status
        .map(|value| ProjectStatus::from_str(&value))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::UpdateProjectRequest;

    #[test]
    fn sparse_update_distinguishes_absent_from_null() {
        let request: UpdateProjectRequest =
            match serde_json::from_str(r#"{"status": "APPROVED", "beneficiary": null}"#) {
                Ok(request) => request,
                Err(error) => panic!("deserialization failed: {error}"),
            };

        let patch = match request.into_patch() {
            Ok(patch) => patch,
            Err(error) => panic!("conversion failed: {error}"),
        };

        assert!(patch.title.is_none());
        assert_eq!(patch.beneficiary, Some(None));
        assert!(patch.status.is_some());
    }

    #[test]
    fn unknown_status_is_rejected() {
        let request: UpdateProjectRequest = match serde_json::from_str(r#"{"status": "ON_HOLD"}"#) {
            Ok(request) => request,
            Err(error) => panic!("deserialization failed: {error}"),
        };

        assert!(request.into_patch().is_err());
    }
}
