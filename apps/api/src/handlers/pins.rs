use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use setrack_core::ActorContext;
use uuid::Uuid;

use crate::dto::{CreatePinRequest, PinResponse, SuccessResponse, UpdatePinRequest};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_pins_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<PinResponse>>> {
    let pins = state
        .pin_service
        .list()
        .await?
        .into_iter()
        .map(PinResponse::from)
        .collect();

    Ok(Json(pins))
}

pub async fn create_pin_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Json(payload): Json<CreatePinRequest>,
) -> ApiResult<(StatusCode, Json<PinResponse>)> {
    let pin = state
        .pin_service
        .create(actor.user_id(), payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(PinResponse::from(pin))))
}

pub async fn get_pin_handler(
    State(state): State<AppState>,
    Path(pin_id): Path<Uuid>,
) -> ApiResult<Json<PinResponse>> {
    let pin = state.pin_service.get(pin_id).await?;
    Ok(Json(PinResponse::from(pin)))
}

pub async fn update_pin_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(pin_id): Path<Uuid>,
    Json(payload): Json<UpdatePinRequest>,
) -> ApiResult<Json<PinResponse>> {
    let pin = state
        .pin_service
        .update(actor.user_id(), pin_id, payload.into())
        .await?;

    Ok(Json(PinResponse::from(pin)))
}

pub async fn delete_pin_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(pin_id): Path<Uuid>,
) -> ApiResult<Json<SuccessResponse>> {
    state.pin_service.delete(actor.user_id(), pin_id).await?;

    Ok(Json(SuccessResponse { success: true }))
}
