// handlers/protected/tasks/mod.rs - /api/projects/:project_id/tasks
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::api::json::{nullable_date, patch_date};
use crate::database::models::{Priority, TaskStatus};

pub mod collection; // GET, POST /api/projects/:project_id/tasks
pub mod record; // GET, PUT, DELETE /api/projects/:project_id/tasks/:task_id

pub use collection::get as tasks_get;
pub use collection::post as tasks_post;
pub use record::delete as task_delete;
pub use record::get as task_get;
pub use record::put as task_put;

const TITLE_REQUIRED: &str = "Task title is required";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTask {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default, deserialize_with = "nullable_date")]
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTask {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default, deserialize_with = "patch_date")]
    pub due_date: Option<Option<DateTime<Utc>>>,
}
