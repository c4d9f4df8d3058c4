//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod audit;
mod document;
mod event;
mod messaging;
mod notification;
mod patch;
mod period;
mod pin;
mod poll;
mod project;
mod user;

pub use audit::{AuditAction, ResourceKind};
pub use document::{Document, DocumentPatch, NewDocument};
pub use event::{CalendarEvent, CalendarEventPatch, NewCalendarEvent, staffing_additions};
pub use messaging::{Conversation, Message, Participant, conversation_is_unread};
pub use notification::{Notification, NotificationKind};
pub use patch::apply_field;
pub use period::{day_bounds, month_bounds, year_bounds};
pub use pin::{MapPin, MapPinPatch, NewMapPin};
pub use poll::NewItemTracker;
pub use project::{NewProject, Project, ProjectCode, ProjectPatch, ProjectStatus};
pub use user::{NewUserAccount, UserAccount, UserAccountPatch, UserRole};
