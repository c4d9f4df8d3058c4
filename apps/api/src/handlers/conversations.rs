use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use setrack_core::{ActorContext, UserId};
use uuid::Uuid;

use crate::dto::{
    ConversationResponse, ConversationSummaryResponse, CreateConversationRequest, MessageResponse,
    SendMessageRequest, SuccessResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn create_conversation_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Json(payload): Json<CreateConversationRequest>,
) -> ApiResult<(StatusCode, Json<ConversationResponse>)> {
    let user_id = actor.require()?;
    let participant_ids = payload
        .participant_ids
        .into_iter()
        .map(UserId::from_uuid)
        .collect();
    let conversation = state
        .messaging_service
        .create_conversation(user_id, participant_ids, payload.is_group, payload.name)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ConversationResponse::from(conversation)),
    ))
}

pub async fn list_conversations_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
) -> ApiResult<Json<Vec<ConversationSummaryResponse>>> {
    let user_id = actor.require()?;
    let summaries = state
        .messaging_service
        .conversations(user_id)
        .await?
        .into_iter()
        .map(ConversationSummaryResponse::from)
        .collect();

    Ok(Json(summaries))
}

pub async fn list_messages_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(conversation_id): Path<Uuid>,
) -> ApiResult<Json<Vec<MessageResponse>>> {
    let user_id = actor.require()?;
    let messages = state
        .messaging_service
        .messages(user_id, conversation_id)
        .await?
        .into_iter()
        .map(MessageResponse::from)
        .collect();

    Ok(Json(messages))
}

pub async fn send_message_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(conversation_id): Path<Uuid>,
    Json(payload): Json<SendMessageRequest>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let user_id = actor.require()?;
    let message = state
        .messaging_service
        .send_message(user_id, conversation_id, payload.body)
        .await?;

    Ok((StatusCode::CREATED, Json(MessageResponse::from(message))))
}

pub async fn mark_conversation_read_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(conversation_id): Path<Uuid>,
) -> ApiResult<Json<SuccessResponse>> {
    let user_id = actor.require()?;
    state
        .messaging_service
        .mark_read(user_id, conversation_id)
        .await?;

    Ok(Json(SuccessResponse { success: true }))
}
