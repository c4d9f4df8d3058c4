use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use setrack_core::{ActorContext, UserId};
use uuid::Uuid;

use crate::dto::{
    CreateUserRequest, SuccessResponse, UpdateUserRequest, UserListQuery, UserResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_users_handler(
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = state
        .user_service
        .list(query.search)
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    Ok(Json(users))
}

pub async fn create_user_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let account = state
        .user_service
        .create(actor.user_id(), payload.into_input()?)
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(account))))
}

pub async fn get_user_handler(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<UserResponse>> {
    let account = state.user_service.get(UserId::from_uuid(user_id)).await?;
    Ok(Json(UserResponse::from(account)))
}

pub async fn update_user_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    let account = state
        .user_service
        .update(actor.user_id(), UserId::from_uuid(user_id), payload.into_patch()?)
        .await?;

    Ok(Json(UserResponse::from(account)))
}

pub async fn delete_user_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<SuccessResponse>> {
    state
        .user_service
        .delete(actor.user_id(), UserId::from_uuid(user_id))
        .await?;

    Ok(Json(SuccessResponse { success: true }))
}
