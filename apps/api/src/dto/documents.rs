use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use setrack_domain::{Document, DocumentPatch, NewDocument};
use uuid::Uuid;

use super::common::double_option;

/// Incoming payload for document creation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentRequest {
    pub project_id: Uuid,
    pub title: String,
    pub category: String,
    pub file_name: String,
    pub remarks: Option<String>,
}

impl From<CreateDocumentRequest> for NewDocument {
    fn from(value: CreateDocumentRequest) -> Self {
        Self {
            project_id: value.project_id,
            title: value.title,
            category: value.category,
            file_name: value.file_name,
            remarks: value.remarks,
        }
    }
}

/// Incoming sparse payload for document updates.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDocumentRequest {
    pub title: Option<String>,
    pub category: Option<String>,
    pub file_name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub remarks: Option<Option<String>>,
}

impl From<UpdateDocumentRequest> for DocumentPatch {
    fn from(value: UpdateDocumentRequest) -> Self {
        Self {
            title: value.title,
            category: value.category,
            file_name: value.file_name,
            remarks: value.remarks,
        }
    }
}

/// Filters accepted by the document listing endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentListQuery {
    pub project_id: Option<Uuid>,
    pub search: Option<String>,
}

/// API representation of a document.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponse {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub category: String,
    pub file_name: String,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Document> for DocumentResponse {
    fn from(value: Document) -> Self {
        Self {
            id: value.id,
            project_id: value.project_id,
            title: value.title,
            category: value.category,
            file_name: value.file_name,
            remarks: value.remarks,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}
