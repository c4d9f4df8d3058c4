use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use setrack_core::{AppError, AppResult};
use uuid::Uuid;

use crate::patch::apply_field;

/// Human-readable sequential project code, e.g. `SETUP-0001`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectCode(String);

impl ProjectCode {
    /// Prefix shared by all project codes.
    pub const PREFIX: &'static str = "SETUP";

    /// Formats a code from a 1-based sequence number, zero-padded to 4 digits.
    ///
    /// The sequence is derived from the current project count + 1, which is
    /// not collision-free under concurrent creates.
    #[must_use]
    pub fn assign(sequence: u64) -> Self {
        Self(format!("{}-{:04}", Self::PREFIX, sequence))
    }

    /// Restores a code from its stored value.
    pub fn parse(value: &str) -> AppResult<Self> {
        let Some(digits) = value.strip_prefix(Self::PREFIX).and_then(|rest| rest.strip_prefix('-'))
        else {
            return Err(AppError::Validation(format!(
                "invalid project code '{value}'"
            )));
        };
        if digits.len() < 4 || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(AppError::Validation(format!(
                "invalid project code '{value}'"
            )));
        }

        Ok(Self(value.to_owned()))
    }

    /// Returns the stored code value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Lifecycle states of a tracked project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    /// Submitted, awaiting evaluation.
    Proposed,
    /// Approved for funding.
    Approved,
    /// Implementation in progress.
    Ongoing,
    /// Implementation finished.
    Completed,
    /// Cancelled before completion.
    Terminated,
}

impl ProjectStatus {
    /// Returns a stable storage value for this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Proposed => "PROPOSED",
            Self::Approved => "APPROVED",
            Self::Ongoing => "ONGOING",
            Self::Completed => "COMPLETED",
            Self::Terminated => "TERMINATED",
        }
    }
}

impl FromStr for ProjectStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "PROPOSED" => Ok(Self::Proposed),
            "APPROVED" => Ok(Self::Approved),
            "ONGOING" => Ok(Self::Ongoing),
            "COMPLETED" => Ok(Self::Completed),
            "TERMINATED" => Ok(Self::Terminated),
            _ => Err(AppError::Validation(format!(
                "unknown project status '{value}'"
            ))),
        }
    }
}

/// A SETUP/CEST project tracked by the program office.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Stable identifier.
    pub id: Uuid,
    /// Sequential display code.
    pub code: ProjectCode,
    /// Project title.
    pub title: String,
    /// Optional long-form description.
    pub description: Option<String>,
    /// Current lifecycle status.
    pub status: ProjectStatus,
    /// Assisted firm or cooperator.
    pub beneficiary: Option<String>,
    /// Implementation site.
    pub location: Option<String>,
    /// Amount granted in centavos.
    pub amount_granted: Option<i64>,
    /// Planned start date.
    pub start_date: Option<NaiveDate>,
    /// Planned end date.
    pub end_date: Option<NaiveDate>,
    /// Insertion timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Applies a sparse patch and returns the names of fields whose stored
    /// value changed. An empty patch changes nothing.
    pub fn apply(&mut self, patch: ProjectPatch, now: DateTime<Utc>) -> Vec<String> {
        let mut changed = Vec::new();
        apply_field(&mut self.title, patch.title, "title", &mut changed);
        apply_field(
            &mut self.description,
            patch.description,
            "description",
            &mut changed,
        );
        apply_field(&mut self.status, patch.status, "status", &mut changed);
        apply_field(
            &mut self.beneficiary,
            patch.beneficiary,
            "beneficiary",
            &mut changed,
        );
        apply_field(&mut self.location, patch.location, "location", &mut changed);
        apply_field(
            &mut self.amount_granted,
            patch.amount_granted,
            "amountGranted",
            &mut changed,
        );
        apply_field(
            &mut self.start_date,
            patch.start_date,
            "startDate",
            &mut changed,
        );
        apply_field(&mut self.end_date, patch.end_date, "endDate", &mut changed);

        if !changed.is_empty() {
            self.updated_at = now;
        }

        changed
    }
}

/// Validated input for project creation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProject {
    /// Project title.
    pub title: String,
    /// Optional long-form description.
    pub description: Option<String>,
    /// Initial lifecycle status.
    pub status: ProjectStatus,
    /// Assisted firm or cooperator.
    pub beneficiary: Option<String>,
    /// Implementation site.
    pub location: Option<String>,
    /// Amount granted in centavos.
    pub amount_granted: Option<i64>,
    /// Planned start date.
    pub start_date: Option<NaiveDate>,
    /// Planned end date.
    pub end_date: Option<NaiveDate>,
}

/// Sparse update payload for a project. `None` leaves a field untouched;
/// nullable fields use a nested `Option` so an explicit null clears them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectPatch {
    /// New title, when present.
    pub title: Option<String>,
    /// New description, when present.
    pub description: Option<Option<String>>,
    /// New status, when present.
    pub status: Option<ProjectStatus>,
    /// New beneficiary, when present.
    pub beneficiary: Option<Option<String>>,
    /// New location, when present.
    pub location: Option<Option<String>>,
    /// New granted amount, when present.
    pub amount_granted: Option<Option<i64>>,
    /// New start date, when present.
    pub start_date: Option<Option<NaiveDate>>,
    /// New end date, when present.
    pub end_date: Option<Option<NaiveDate>>,
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;
    use uuid::Uuid;

    use super::{NewProject, Project, ProjectCode, ProjectPatch, ProjectStatus};

    fn sample_project() -> Project {
        let created_at = Utc.with_ymd_and_hms(2026, 1, 5, 8, 0, 0).single();
        let timestamp = created_at.unwrap_or_else(Utc::now);
        Project {
            id: Uuid::new_v4(),
            code: ProjectCode::assign(1),
            title: "Acme Upgrade".to_owned(),
            description: None,
            status: ProjectStatus::Proposed,
            beneficiary: Some("Acme Foods".to_owned()),
            location: None,
            amount_granted: Some(500_000_00),
            start_date: None,
            end_date: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    #[test]
    fn empty_patch_changes_nothing() {
        let mut project = sample_project();
        let before = project.clone();

        let changed = project.apply(ProjectPatch::default(), Utc::now());

        assert!(changed.is_empty());
        assert_eq!(project, before);
    }

    #[test]
    fn status_patch_reports_single_changed_field() {
        let mut project = sample_project();

        let changed = project.apply(
            ProjectPatch {
                status: Some(ProjectStatus::Approved),
                ..ProjectPatch::default()
            },
            Utc::now(),
        );

        assert_eq!(changed, vec!["status".to_owned()]);
        assert_eq!(project.status, ProjectStatus::Approved);
    }

    #[test]
    fn same_value_patch_reports_no_change() {
        let mut project = sample_project();

        let changed = project.apply(
            ProjectPatch {
                title: Some("Acme Upgrade".to_owned()),
                ..ProjectPatch::default()
            },
            Utc::now(),
        );

        assert!(changed.is_empty());
    }

    #[test]
    fn explicit_null_clears_nullable_field() {
        let mut project = sample_project();

        let changed = project.apply(
            ProjectPatch {
                beneficiary: Some(None),
                ..ProjectPatch::default()
            },
            Utc::now(),
        );

        assert_eq!(changed, vec!["beneficiary".to_owned()]);
        assert_eq!(project.beneficiary, None);
    }

    #[test]
    fn new_project_input_keeps_all_fields() {
        let input = NewProject {
            title: "Packaging Line".to_owned(),
            description: Some("New line".to_owned()),
            status: ProjectStatus::Proposed,
            beneficiary: None,
            location: Some("Region IV-A".to_owned()),
            amount_granted: None,
            start_date: None,
            end_date: None,
        };
        assert_eq!(input.title, "Packaging Line");
    }

    proptest! {
        #[test]
        fn project_code_roundtrips(sequence in 1_u64..100_000) {
            let code = ProjectCode::assign(sequence);
            prop_assert!(code.as_str().starts_with("SETUP-"));
            let restored = ProjectCode::parse(code.as_str());
            prop_assert_eq!(restored.ok(), Some(code));
        }
    }
}
