//! Setrack API composition root.

#![forbid(unsafe_code)]

mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;

use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, HeaderValue, Method};
use axum::middleware::from_fn;
use axum::routing::{get, post};
use setrack_application::{
    ActivityLogService, AuditRecorder, DocumentService, EventService, MessagingService,
    NotificationService, PinService, ProjectService, UserService,
};
use setrack_core::AppError;
use setrack_infrastructure::{
    PostgresAuditLogRepository, PostgresAuditRepository, PostgresDocumentRepository,
    PostgresEventRepository, PostgresMessagingRepository, PostgresNotificationRepository,
    PostgresPinRepository, PostgresProjectRepository, PostgresUserRepository,
};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

    let database_url = required_env("DATABASE_URL")?;
    let frontend_url =
        env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());
    let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
    let api_port = env::var("API_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(3001);

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    if migrate_only {
        info!("database migrations applied successfully");
        return Ok(());
    }

    let audit_repository = Arc::new(PostgresAuditRepository::new(pool.clone()));
    let audit = AuditRecorder::new(audit_repository);
    let audit_log_repository = Arc::new(PostgresAuditLogRepository::new(pool.clone()));
    let activity_log_service = ActivityLogService::new(audit_log_repository);

    let user_repository = Arc::new(PostgresUserRepository::new(pool.clone()));
    let user_service = UserService::new(user_repository.clone(), audit.clone());

    let notification_repository = Arc::new(PostgresNotificationRepository::new(pool.clone()));
    let notification_service =
        NotificationService::new(notification_repository, user_repository);

    let project_repository = Arc::new(PostgresProjectRepository::new(pool.clone()));
    let project_service = ProjectService::new(project_repository.clone(), audit.clone());

    let document_repository = Arc::new(PostgresDocumentRepository::new(pool.clone()));
    let document_service =
        DocumentService::new(document_repository, project_repository, audit.clone());

    let event_repository = Arc::new(PostgresEventRepository::new(pool.clone()));
    let event_service = EventService::new(
        event_repository,
        audit.clone(),
        notification_service.clone(),
    );

    let pin_repository = Arc::new(PostgresPinRepository::new(pool.clone()));
    let pin_service = PinService::new(pin_repository, audit);

    let messaging_repository = Arc::new(PostgresMessagingRepository::new(pool.clone()));
    let messaging_service = MessagingService::new(messaging_repository);

    let app_state = AppState {
        project_service,
        document_service,
        event_service,
        pin_service,
        user_service,
        notification_service,
        messaging_service,
        activity_log_service,
        postgres_pool: pool,
    };

    let cors_layer = CorsLayer::new()
        .allow_origin(
            HeaderValue::from_str(&frontend_url)
                .map_err(|error| AppError::Internal(format!("invalid FRONTEND_URL: {error}")))?,
        )
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            CONTENT_TYPE,
            HeaderName::from_static(middleware::ACTOR_HEADER),
        ]);

    let app = Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route(
            "/api/projects",
            get(handlers::projects::list_projects_handler)
                .post(handlers::projects::create_project_handler),
        )
        .route(
            "/api/projects/stats",
            get(handlers::projects::project_stats_handler),
        )
        .route(
            "/api/projects/{project_id}",
            get(handlers::projects::get_project_handler)
                .patch(handlers::projects::update_project_handler)
                .delete(handlers::projects::delete_project_handler),
        )
        .route(
            "/api/projects/{project_id}/documents",
            get(handlers::projects::list_project_documents_handler),
        )
        .route(
            "/api/documents",
            get(handlers::documents::list_documents_handler)
                .post(handlers::documents::create_document_handler),
        )
        .route(
            "/api/documents/{document_id}",
            get(handlers::documents::get_document_handler)
                .patch(handlers::documents::update_document_handler)
                .delete(handlers::documents::delete_document_handler),
        )
        .route(
            "/api/events",
            get(handlers::events::list_events_handler)
                .post(handlers::events::create_event_handler),
        )
        .route(
            "/api/events/{event_id}",
            get(handlers::events::get_event_handler)
                .patch(handlers::events::update_event_handler)
                .delete(handlers::events::delete_event_handler),
        )
        .route(
            "/api/pins",
            get(handlers::pins::list_pins_handler).post(handlers::pins::create_pin_handler),
        )
        .route(
            "/api/pins/{pin_id}",
            get(handlers::pins::get_pin_handler)
                .patch(handlers::pins::update_pin_handler)
                .delete(handlers::pins::delete_pin_handler),
        )
        .route(
            "/api/users",
            get(handlers::users::list_users_handler).post(handlers::users::create_user_handler),
        )
        .route(
            "/api/users/{user_id}",
            get(handlers::users::get_user_handler)
                .patch(handlers::users::update_user_handler)
                .delete(handlers::users::delete_user_handler),
        )
        .route(
            "/api/user-logs",
            get(handlers::audit::list_user_logs_handler),
        )
        .route(
            "/api/notifications",
            get(handlers::notifications::list_notifications_handler),
        )
        .route(
            "/api/notifications/{notification_id}/read",
            axum::routing::put(handlers::notifications::mark_notification_read_handler),
        )
        .route(
            "/api/notifications/read-all",
            post(handlers::notifications::mark_all_notifications_read_handler),
        )
        .route(
            "/api/conversations",
            get(handlers::conversations::list_conversations_handler)
                .post(handlers::conversations::create_conversation_handler),
        )
        .route(
            "/api/conversations/{conversation_id}/messages",
            get(handlers::conversations::list_messages_handler)
                .post(handlers::conversations::send_message_handler),
        )
        .route(
            "/api/conversations/{conversation_id}/read",
            post(handlers::conversations::mark_conversation_read_handler),
        )
        .layer(from_fn(middleware::resolve_actor))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(app_state);

    let host = IpAddr::from_str(&api_host)
        .map_err(|error| AppError::Internal(format!("invalid API_HOST '{api_host}': {error}")))?;
    let address = SocketAddr::from((host, api_port));

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "setrack-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}
