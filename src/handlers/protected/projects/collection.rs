use axum::{extract::State, Extension};

use super::{CreateProject, NAME_REQUIRED};
use crate::api::ApiJson;
use crate::database::models::{NewProject, Project};
use crate::database::repository::ProjectRepository;
use crate::handlers::protected::{required_text, trimmed};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// GET /api/projects - the caller's projects, newest first
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Vec<Project>> {
    let projects = state.store.list_projects(auth.user_id).await?;
    Ok(ApiResponse::success(projects))
}

/// POST /api/projects - create a project owned by the caller
pub async fn post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ApiJson(body): ApiJson<CreateProject>,
) -> ApiResult<Project> {
    let name = required_text(body.name, NAME_REQUIRED)?;

    let project = state
        .store
        .create_project(NewProject {
            owner: auth.user_id,
            name,
            description: trimmed(body.description).unwrap_or_default(),
            priority: body.priority.unwrap_or_default(),
            due_date: body.due_date,
        })
        .await?;

    tracing::info!("User {} created project {}", auth.user_id, project.id);
    Ok(ApiResponse::created(project))
}
