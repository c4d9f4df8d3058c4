mod audit;
mod common;
mod documents;
mod events;
mod messaging;
mod notifications;
mod pins;
mod projects;
mod users;

pub use audit::{UserLogQuery, UserLogsResponse};
pub use common::{HealthResponse, SuccessResponse};
pub use documents::{
    CreateDocumentRequest, DocumentListQuery, DocumentResponse, UpdateDocumentRequest,
};
pub use events::{CreateEventRequest, EventListQuery, EventResponse, UpdateEventRequest};
pub use messaging::{
    ConversationResponse, ConversationSummaryResponse, CreateConversationRequest, MessageResponse,
    SendMessageRequest,
};
pub use notifications::{MarkAllReadResponse, NotificationResponse};
pub use pins::{CreatePinRequest, PinResponse, UpdatePinRequest};
pub use projects::{
    CreateProjectRequest, ProjectListQuery, ProjectResponse, ProjectStatsResponse,
    UpdateProjectRequest, parse_status_filter,
};
pub use users::{CreateUserRequest, UpdateUserRequest, UserListQuery, UserResponse};
