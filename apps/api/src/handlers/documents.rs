use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use setrack_application::DocumentListFilter;
use setrack_core::ActorContext;
use uuid::Uuid;

use crate::dto::{
    CreateDocumentRequest, DocumentListQuery, DocumentResponse, SuccessResponse,
    UpdateDocumentRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_documents_handler(
    State(state): State<AppState>,
    Query(query): Query<DocumentListQuery>,
) -> ApiResult<Json<Vec<DocumentResponse>>> {
    let documents = state
        .document_service
        .list(DocumentListFilter {
            project_id: query.project_id,
            search: query.search,
        })
        .await?
        .into_iter()
        .map(DocumentResponse::from)
        .collect();

    Ok(Json(documents))
}

pub async fn create_document_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Json(payload): Json<CreateDocumentRequest>,
) -> ApiResult<(StatusCode, Json<DocumentResponse>)> {
    let document = state
        .document_service
        .create(actor.user_id(), payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(DocumentResponse::from(document))))
}

pub async fn get_document_handler(
    State(state): State<AppState>,
    Path(document_id): Path<Uuid>,
) -> ApiResult<Json<DocumentResponse>> {
    let document = state.document_service.get(document_id).await?;
    Ok(Json(DocumentResponse::from(document)))
}

pub async fn update_document_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(document_id): Path<Uuid>,
    Json(payload): Json<UpdateDocumentRequest>,
) -> ApiResult<Json<DocumentResponse>> {
    let document = state
        .document_service
        .update(actor.user_id(), document_id, payload.into())
        .await?;

    Ok(Json(DocumentResponse::from(document)))
}

pub async fn delete_document_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(document_id): Path<Uuid>,
) -> ApiResult<Json<SuccessResponse>> {
    state
        .document_service
        .delete(actor.user_id(), document_id)
        .await?;

    Ok(Json(SuccessResponse { success: true }))
}
