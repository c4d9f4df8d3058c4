use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::patch::apply_field;

/// A document attached to a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Stable identifier.
    pub id: Uuid,
    /// Owning project. Deleting the project cascades here.
    pub project_id: Uuid,
    /// Document title.
    pub title: String,
    /// Classification label, e.g. "PROPOSAL" or "TERMINAL_REPORT".
    pub category: String,
    /// Stored file name.
    pub file_name: String,
    /// Free-form remarks.
    pub remarks: Option<String>,
    /// Insertion timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// Applies a sparse patch and returns the changed field names.
    pub fn apply(&mut self, patch: DocumentPatch, now: DateTime<Utc>) -> Vec<String> {
        let mut changed = Vec::new();
        apply_field(&mut self.title, patch.title, "title", &mut changed);
        apply_field(&mut self.category, patch.category, "category", &mut changed);
        apply_field(
            &mut self.file_name,
            patch.file_name,
            "fileName",
            &mut changed,
        );
        apply_field(&mut self.remarks, patch.remarks, "remarks", &mut changed);

        if !changed.is_empty() {
            self.updated_at = now;
        }

        changed
    }
}

/// Validated input for document creation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDocument {
    /// Owning project.
    pub project_id: Uuid,
    /// Document title.
    pub title: String,
    /// Classification label.
    pub category: String,
    /// Stored file name.
    pub file_name: String,
    /// Free-form remarks.
    pub remarks: Option<String>,
}

/// Sparse update payload for a document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentPatch {
    /// New title, when present.
    pub title: Option<String>,
    /// New category, when present.
    pub category: Option<String>,
    /// New file name, when present.
    pub file_name: Option<String>,
    /// New remarks, when present.
    pub remarks: Option<Option<String>>,
}
