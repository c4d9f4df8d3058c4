use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use setrack_core::UserId;
use uuid::Uuid;

use crate::patch::apply_field;

/// A calendar/booking event with assigned staff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Stable identifier.
    pub id: Uuid,
    /// Event title.
    pub title: String,
    /// Optional long-form description.
    pub description: Option<String>,
    /// Venue or meeting link.
    pub location: Option<String>,
    /// Start of the booking window.
    pub starts_at: DateTime<Utc>,
    /// End of the booking window.
    pub ends_at: DateTime<Utc>,
    /// Staff members involved in the event.
    pub staff_involved: Vec<UserId>,
    /// Primary personnel assigned to the event.
    pub assigned_personnel: Option<UserId>,
    /// User who booked the event.
    pub booked_by: Option<UserId>,
    /// Insertion timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl CalendarEvent {
    /// Applies a sparse patch and returns the changed field names.
    pub fn apply(&mut self, patch: CalendarEventPatch, now: DateTime<Utc>) -> Vec<String> {
        let mut changed = Vec::new();
        apply_field(&mut self.title, patch.title, "title", &mut changed);
        apply_field(
            &mut self.description,
            patch.description,
            "description",
            &mut changed,
        );
        apply_field(&mut self.location, patch.location, "location", &mut changed);
        apply_field(&mut self.starts_at, patch.starts_at, "startsAt", &mut changed);
        apply_field(&mut self.ends_at, patch.ends_at, "endsAt", &mut changed);
        apply_field(
            &mut self.staff_involved,
            patch.staff_involved,
            "staffInvolved",
            &mut changed,
        );
        apply_field(
            &mut self.assigned_personnel,
            patch.assigned_personnel,
            "assignedPersonnel",
            &mut changed,
        );

        if !changed.is_empty() {
            self.updated_at = now;
        }

        changed
    }
}

/// Validated input for event creation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCalendarEvent {
    /// Event title.
    pub title: String,
    /// Optional long-form description.
    pub description: Option<String>,
    /// Venue or meeting link.
    pub location: Option<String>,
    /// Start of the booking window.
    pub starts_at: DateTime<Utc>,
    /// End of the booking window.
    pub ends_at: DateTime<Utc>,
    /// Staff members involved in the event.
    pub staff_involved: Vec<UserId>,
    /// Primary personnel assigned to the event.
    pub assigned_personnel: Option<UserId>,
}

/// Sparse update payload for a calendar event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalendarEventPatch {
    /// New title, when present.
    pub title: Option<String>,
    /// New description, when present.
    pub description: Option<Option<String>>,
    /// New location, when present.
    pub location: Option<Option<String>>,
    /// New start, when present.
    pub starts_at: Option<DateTime<Utc>>,
    /// New end, when present.
    pub ends_at: Option<DateTime<Utc>>,
    /// Full replacement staff list, when present.
    pub staff_involved: Option<Vec<UserId>>,
    /// New assigned personnel, when present.
    pub assigned_personnel: Option<Option<UserId>>,
}

/// Returns the users present in `after` but not in `before`, preserving the
/// order of `after` and dropping duplicates.
///
/// Removed users are deliberately not part of the result; only newly exposed
/// users are notified.
#[must_use]
pub fn staffing_additions(before: &[UserId], after: &[UserId]) -> Vec<UserId> {
    let known: HashSet<UserId> = before.iter().copied().collect();
    let mut seen = HashSet::new();
    after
        .iter()
        .copied()
        .filter(|user_id| !known.contains(user_id) && seen.insert(*user_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use setrack_core::UserId;

    use super::staffing_additions;

    #[test]
    fn additions_exclude_retained_and_removed_users() {
        let kept = UserId::new();
        let removed = UserId::new();
        let added_one = UserId::new();
        let added_two = UserId::new();

        let additions = staffing_additions(&[kept, removed], &[kept, added_one, added_two]);

        assert_eq!(additions, vec![added_one, added_two]);
    }

    #[test]
    fn unchanged_staffing_yields_no_additions() {
        let staff = vec![UserId::new(), UserId::new()];
        assert!(staffing_additions(&staff, &staff).is_empty());
    }

    #[test]
    fn duplicate_additions_are_reported_once() {
        let added = UserId::new();
        let additions = staffing_additions(&[], &[added, added]);
        assert_eq!(additions, vec![added]);
    }
}
