use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::patch::apply_field;

/// A pin on the program map, optionally linked to a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapPin {
    /// Stable identifier.
    pub id: Uuid,
    /// Display label.
    pub label: String,
    /// WGS84 latitude.
    pub latitude: f64,
    /// WGS84 longitude.
    pub longitude: f64,
    /// Linked project, when the pin marks a project site.
    pub project_id: Option<Uuid>,
    /// Free-form remarks.
    pub remarks: Option<String>,
    /// Insertion timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl MapPin {
    /// Applies a sparse patch and returns the changed field names.
    pub fn apply(&mut self, patch: MapPinPatch, now: DateTime<Utc>) -> Vec<String> {
        let mut changed = Vec::new();
        apply_field(&mut self.label, patch.label, "label", &mut changed);
        apply_field(&mut self.latitude, patch.latitude, "latitude", &mut changed);
        apply_field(
            &mut self.longitude,
            patch.longitude,
            "longitude",
            &mut changed,
        );
        apply_field(
            &mut self.project_id,
            patch.project_id,
            "projectId",
            &mut changed,
        );
        apply_field(&mut self.remarks, patch.remarks, "remarks", &mut changed);

        if !changed.is_empty() {
            self.updated_at = now;
        }

        changed
    }
}

/// Validated input for pin creation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMapPin {
    /// Display label.
    pub label: String,
    /// WGS84 latitude.
    pub latitude: f64,
    /// WGS84 longitude.
    pub longitude: f64,
    /// Linked project, when the pin marks a project site.
    pub project_id: Option<Uuid>,
    /// Free-form remarks.
    pub remarks: Option<String>,
}

/// Sparse update payload for a map pin.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapPinPatch {
    /// New label, when present.
    pub label: Option<String>,
    /// New latitude, when present.
    pub latitude: Option<f64>,
    /// New longitude, when present.
    pub longitude: Option<f64>,
    /// New project link, when present.
    pub project_id: Option<Option<Uuid>>,
    /// New remarks, when present.
    pub remarks: Option<Option<String>>,
}
