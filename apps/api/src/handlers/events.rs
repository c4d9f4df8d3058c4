use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use setrack_application::EventListFilter;
use setrack_core::ActorContext;
use uuid::Uuid;

use crate::dto::{
    CreateEventRequest, EventListQuery, EventResponse, SuccessResponse, UpdateEventRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_events_handler(
    State(state): State<AppState>,
    Query(query): Query<EventListQuery>,
) -> ApiResult<Json<Vec<EventResponse>>> {
    let events = state
        .event_service
        .list(EventListFilter {
            from: query.from,
            to: query.to,
        })
        .await?
        .into_iter()
        .map(EventResponse::from)
        .collect();

    Ok(Json(events))
}

pub async fn create_event_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Json(payload): Json<CreateEventRequest>,
) -> ApiResult<(StatusCode, Json<EventResponse>)> {
    let event = state
        .event_service
        .create(actor.user_id(), payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(EventResponse::from(event))))
}

pub async fn get_event_handler(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> ApiResult<Json<EventResponse>> {
    let event = state.event_service.get(event_id).await?;
    Ok(Json(EventResponse::from(event)))
}

pub async fn update_event_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(event_id): Path<Uuid>,
    Json(payload): Json<UpdateEventRequest>,
) -> ApiResult<Json<EventResponse>> {
    let event = state
        .event_service
        .update(actor.user_id(), event_id, payload.into())
        .await?;

    Ok(Json(EventResponse::from(event)))
}

pub async fn delete_event_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(event_id): Path<Uuid>,
) -> ApiResult<Json<SuccessResponse>> {
    state.event_service.delete(actor.user_id(), event_id).await?;

    Ok(Json(SuccessResponse { success: true }))
}
