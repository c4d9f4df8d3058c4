use setrack_application::{
    ActivityLogService, DocumentService, EventService, MessagingService, NotificationService,
    PinService, ProjectService, UserService,
};
use sqlx::PgPool;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub project_service: ProjectService,
    pub document_service: DocumentService,
    pub event_service: EventService,
    pub pin_service: PinService,
    pub user_service: UserService,
    pub notification_service: NotificationService,
    pub messaging_service: MessagingService,
    pub activity_log_service: ActivityLogService,
    pub postgres_pool: PgPool,
}
