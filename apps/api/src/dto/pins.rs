use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use setrack_domain::{MapPin, MapPinPatch, NewMapPin};
use uuid::Uuid;

use super::common::double_option;

/// Incoming payload for pin creation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePinRequest {
    pub label: String,
    pub latitude: f64,
    pub longitude: f64,
    pub project_id: Option<Uuid>,
    pub remarks: Option<String>,
}

impl From<CreatePinRequest> for NewMapPin {
    fn from(value: CreatePinRequest) -> Self {
        Self {
            label: value.label,
            latitude: value.latitude,
            longitude: value.longitude,
            project_id: value.project_id,
            remarks: value.remarks,
        }
    }
}

/// Incoming sparse payload for pin updates.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePinRequest {
    pub label: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "double_option")]
    pub project_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "double_option")]
    pub remarks: Option<Option<String>>,
}

impl From<UpdatePinRequest> for MapPinPatch {
    fn from(value: UpdatePinRequest) -> Self {
        Self {
            label: value.label,
            latitude: value.latitude,
            longitude: value.longitude,
            project_id: value.project_id,
            remarks: value.remarks,
        }
    }
}

/// API representation of a map pin.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PinResponse {
    pub id: Uuid,
    pub label: String,
    pub latitude: f64,
    pub longitude: f64,
    pub project_id: Option<Uuid>,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MapPin> for PinResponse {
    fn from(value: MapPin) -> Self {
        Self {
            id: value.id,
            label: value.label,
            latitude: value.latitude,
            longitude: value.longitude,
            project_id: value.project_id,
            remarks: value.remarks,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}
