use std::str::FromStr;

use axum::Json;
use axum::extract::{Query, State};
use setrack_application::AuditLogFilter;
use setrack_core::UserId;
use setrack_domain::AuditAction;

use crate::dto::{UserLogQuery, UserLogsResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_user_logs_handler(
    State(state): State<AppState>,
    Query(query): Query<UserLogQuery>,
) -> ApiResult<Json<UserLogsResponse>> {
    let action = query
        .action
        .map(|value| AuditAction::from_str(&value))
        .transpose()?;

    let page = state
        .activity_log_service
        .list(
            AuditLogFilter {
                user_id: query.user_id.map(UserId::from_uuid),
                action,
                search: query.search,
            },
            query.limit.unwrap_or(50),
            query.offset.unwrap_or(0),
        )
        .await?;

    Ok(Json(UserLogsResponse::from(page)))
}
