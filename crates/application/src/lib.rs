//! Application services and ports.

#![forbid(unsafe_code)]

mod activity_log_service;
mod audit;
mod document_service;
mod event_service;
mod messaging_service;
mod notification_service;
mod pin_service;
mod project_service;
mod user_service;

pub use activity_log_service::{
    ActivityLogService, AuditLogEntry, AuditLogFilter, AuditLogPage, AuditLogRepository,
    AuditLogStats,
};
pub use audit::{AuditEvent, AuditRecorder, AuditRepository};
pub use document_service::{DocumentListFilter, DocumentRepository, DocumentService};
pub use event_service::{EventListFilter, EventRepository, EventService};
pub use messaging_service::{ConversationSummary, MessagingRepository, MessagingService};
pub use notification_service::{
    NotificationFeedItem, NotificationRepository, NotificationService, relative_time,
};
pub use pin_service::{PinRepository, PinService};
pub use project_service::{
    ProjectListFilter, ProjectRepository, ProjectService, ProjectStats, StatusCount,
};
pub use user_service::{UserRepository, UserService};
