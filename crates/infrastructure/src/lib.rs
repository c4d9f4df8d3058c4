//! PostgreSQL adapters for the application ports.

#![forbid(unsafe_code)]

mod postgres_audit_log_repository;
mod postgres_audit_repository;
mod postgres_document_repository;
mod postgres_event_repository;
mod postgres_messaging_repository;
mod postgres_notification_repository;
mod postgres_pin_repository;
mod postgres_project_repository;
mod postgres_user_repository;

pub use postgres_audit_log_repository::PostgresAuditLogRepository;
pub use postgres_audit_repository::PostgresAuditRepository;
pub use postgres_document_repository::PostgresDocumentRepository;
pub use postgres_event_repository::PostgresEventRepository;
pub use postgres_messaging_repository::PostgresMessagingRepository;
pub use postgres_notification_repository::PostgresNotificationRepository;
pub use postgres_pin_repository::PostgresPinRepository;
pub use postgres_project_repository::PostgresProjectRepository;
pub use postgres_user_repository::PostgresUserRepository;
