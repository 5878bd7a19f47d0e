use axum::{
    extract::{Path, State},
    Extension,
};
use serde_json::{json, Value};

use super::{UpdateTask, TITLE_REQUIRED};
use crate::api::ApiJson;
use crate::authz::authorize_task;
use crate::database::models::{Task, TaskChanges};
use crate::database::repository::TaskRepository;
use crate::handlers::protected::{optional_required_text, trimmed};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// GET /api/projects/:project_id/tasks/:task_id
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((project_id, task_id)): Path<(String, String)>,
) -> ApiResult<Task> {
    let (_, task) = authorize_task(state.store.as_ref(), &project_id, &task_id, auth.user_id).await?;
    Ok(ApiResponse::success(task))
}

/// PUT /api/projects/:project_id/tasks/:task_id - partial update
pub async fn put(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((project_id, task_id)): Path<(String, String)>,
    ApiJson(body): ApiJson<UpdateTask>,
) -> ApiResult<Task> {
    let changes = TaskChanges {
        title: optional_required_text(body.title, TITLE_REQUIRED)?,
        description: trimmed(body.description),
        note: trimmed(body.note),
        status: body.status,
        priority: body.priority,
        due_date: body.due_date,
    };

    let (_, mut task) =
        authorize_task(state.store.as_ref(), &project_id, &task_id, auth.user_id).await?;
    if !task.apply(changes) {
        return Ok(ApiResponse::success(task));
    }

    let updated = state.store.update_task(&task).await?;
    Ok(ApiResponse::success(updated))
}

/// DELETE /api/projects/:project_id/tasks/:task_id
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((project_id, task_id)): Path<(String, String)>,
) -> ApiResult<Value> {
    let (_, task) = authorize_task(state.store.as_ref(), &project_id, &task_id, auth.user_id).await?;
    state.store.delete_task(task.id).await?;
    Ok(ApiResponse::success(json!({ "message": "Task deleted" })))
}
