use axum::{
    extract::{Path, State},
    Extension,
};

use super::{CreateTask, TITLE_REQUIRED};
use crate::api::ApiJson;
use crate::authz::authorize_project;
use crate::database::models::{NewTask, Task};
use crate::database::repository::TaskRepository;
use crate::handlers::protected::{required_text, trimmed};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// GET /api/projects/:project_id/tasks - newest first
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(project_id): Path<String>,
) -> ApiResult<Vec<Task>> {
    let project = authorize_project(state.store.as_ref(), &project_id, auth.user_id).await?;
    let tasks = state.store.list_tasks(project.id, auth.user_id).await?;
    Ok(ApiResponse::success(tasks))
}

/// POST /api/projects/:project_id/tasks
pub async fn post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(project_id): Path<String>,
    ApiJson(body): ApiJson<CreateTask>,
) -> ApiResult<Task> {
    let title = required_text(body.title, TITLE_REQUIRED)?;
    let project = authorize_project(state.store.as_ref(), &project_id, auth.user_id).await?;

    // The owner is copied from the authorized project, never from the request.
    let mut new_task = NewTask::under(&project, title);
    new_task.description = trimmed(body.description).unwrap_or_default();
    new_task.note = trimmed(body.note).unwrap_or_default();
    new_task.status = body.status.unwrap_or_default();
    new_task.priority = body.priority.unwrap_or_default();
    new_task.due_date = body.due_date;

    let task = state.store.create_task(new_task).await?;
    Ok(ApiResponse::created(task))
}
