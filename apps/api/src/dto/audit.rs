use serde::{Deserialize, Serialize};
use serde_json::Value;
use setrack_application::{AuditLogEntry, AuditLogPage, AuditLogStats};
use uuid::Uuid;

/// Filters accepted by the activity log endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLogQuery {
    pub user_id: Option<Uuid>,
    pub action: Option<String>,
    pub search: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// API representation of an activity log entry.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntryResponse {
    pub id: String,
    pub user_id: Option<String>,
    pub action: String,
    pub resource_type: String,
    pub resource_id: String,
    pub resource_title: String,
    pub details: Value,
    pub created_at: String,
}

impl From<AuditLogEntry> for AuditLogEntryResponse {
    fn from(value: AuditLogEntry) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            action: value.action,
            resource_type: value.resource_type,
            resource_id: value.resource_id,
            resource_title: value.resource_title,
            details: value.details,
            created_at: value.created_at,
        }
    }
}

/// Aggregate counts over the filtered entry set.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogStatsResponse {
    pub total: u64,
    pub today: u64,
    pub this_week: u64,
}

impl From<AuditLogStats> for AuditLogStatsResponse {
    fn from(value: AuditLogStats) -> Self {
        Self {
            total: value.total,
            today: value.today,
            this_week: value.this_week,
        }
    }
}

/// Payload of the activity log endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLogsResponse {
    pub logs: Vec<AuditLogEntryResponse>,
    pub stats: AuditLogStatsResponse,
}

impl From<AuditLogPage> for UserLogsResponse {
    fn from(value: AuditLogPage) -> Self {
        Self {
            logs: value
                .logs
                .into_iter()
                .map(AuditLogEntryResponse::from)
                .collect(),
            stats: AuditLogStatsResponse::from(value.stats),
        }
    }
}
