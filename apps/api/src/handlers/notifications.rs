use axum::Json;
use axum::extract::{Extension, Path, State};
use setrack_core::ActorContext;
use uuid::Uuid;

use crate::dto::{MarkAllReadResponse, NotificationResponse, SuccessResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_notifications_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
) -> ApiResult<Json<Vec<NotificationResponse>>> {
    let user_id = actor.require()?;
    let items = state
        .notification_service
        .feed(user_id)
        .await?
        .into_iter()
        .map(NotificationResponse::from)
        .collect();

    Ok(Json(items))
}

pub async fn mark_notification_read_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(notification_id): Path<Uuid>,
) -> ApiResult<Json<SuccessResponse>> {
    let user_id = actor.require()?;
    state
        .notification_service
        .mark_read(user_id, notification_id)
        .await?;

    Ok(Json(SuccessResponse { success: true }))
}

pub async fn mark_all_notifications_read_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
) -> ApiResult<Json<MarkAllReadResponse>> {
    let user_id = actor.require()?;
    let updated = state.notification_service.mark_all_read(user_id).await?;

    Ok(Json(MarkAllReadResponse { updated }))
}
