use axum::{
    extract::{Path, State},
    Extension,
};
use serde_json::{json, Value};

use super::{UpdateProject, NAME_REQUIRED};
use crate::api::ApiJson;
use crate::authz::authorize_project;
use crate::database::models::{Project, ProjectChanges};
use crate::database::repository::ProjectRepository;
use crate::handlers::protected::{optional_required_text, trimmed};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// GET /api/projects/:project_id
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(project_id): Path<String>,
) -> ApiResult<Project> {
    let project = authorize_project(state.store.as_ref(), &project_id, auth.user_id).await?;
    Ok(ApiResponse::success(project))
}

/// PUT /api/projects/:project_id - partial update; an empty change set is not written
pub async fn put(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(project_id): Path<String>,
    ApiJson(body): ApiJson<UpdateProject>,
) -> ApiResult<Project> {
    let changes = ProjectChanges {
        name: optional_required_text(body.name, NAME_REQUIRED)?,
        description: trimmed(body.description),
        priority: body.priority,
        due_date: body.due_date,
    };

    let mut project = authorize_project(state.store.as_ref(), &project_id, auth.user_id).await?;
    if !project.apply(changes) {
        return Ok(ApiResponse::success(project));
    }

    let updated = state.store.update_project(&project).await?;
    Ok(ApiResponse::success(updated))
}

/// DELETE /api/projects/:project_id - removes the project and its tasks
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(project_id): Path<String>,
) -> ApiResult<Value> {
    let project = authorize_project(state.store.as_ref(), &project_id, auth.user_id).await?;
    state.store.delete_project(project.id).await?;

    tracing::info!("User {} deleted project {}", auth.user_id, project.id);
    Ok(ApiResponse::success(json!({ "message": "Project deleted" })))
}
