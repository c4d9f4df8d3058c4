use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use setrack_application::{DocumentListFilter, ProjectListFilter};
use setrack_core::ActorContext;
use uuid::Uuid;

use crate::dto::{
    CreateProjectRequest, DocumentResponse, ProjectListQuery, ProjectResponse,
    ProjectStatsResponse, SuccessResponse, UpdateProjectRequest, parse_status_filter,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_projects_handler(
    State(state): State<AppState>,
    Query(query): Query<ProjectListQuery>,
) -> ApiResult<Json<Vec<ProjectResponse>>> {
    let filter = ProjectListFilter {
        search: query.search,
        status: parse_status_filter(query.status)?,
        year: query.year,
        month: query.month,
    };
    let projects = state
        .project_service
        .list(filter)
        .await?
        .into_iter()
        .map(ProjectResponse::from)
        .collect();

    Ok(Json(projects))
}

pub async fn project_stats_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<ProjectStatsResponse>> {
    let stats = state.project_service.stats().await?;
    Ok(Json(ProjectStatsResponse::from(stats)))
}

pub async fn create_project_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Json(payload): Json<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<ProjectResponse>)> {
    let project = state
        .project_service
        .create(actor.user_id(), payload.into_input()?)
        .await?;

    Ok((StatusCode::CREATED, Json(ProjectResponse::from(project))))
}

pub async fn get_project_handler(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<ProjectResponse>> {
    let project = state.project_service.get(project_id).await?;
    Ok(Json(ProjectResponse::from(project)))
}

pub async fn update_project_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<UpdateProjectRequest>,
) -> ApiResult<Json<ProjectResponse>> {
    let project = state
        .project_service
        .update(actor.user_id(), project_id, payload.into_patch()?)
        .await?;

    Ok(Json(ProjectResponse::from(project)))
}

pub async fn delete_project_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<SuccessResponse>> {
    state
        .project_service
        .delete(actor.user_id(), project_id)
        .await?;

    Ok(Json(SuccessResponse { success: true }))
}

pub async fn list_project_documents_handler(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<Vec<DocumentResponse>>> {
    // Surface an explicit 404 for unknown projects instead of an empty list.
    state.project_service.get(project_id).await?;

    let documents = state
        .document_service
        .list(DocumentListFilter {
            project_id: Some(project_id),
            search: None,
        })
        .await?
        .into_iter()
        .map(DocumentResponse::from)
        .collect();

    Ok(Json(documents))
}
