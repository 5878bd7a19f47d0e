// handlers/protected/projects/mod.rs - /api/projects
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::api::json::{nullable_date, patch_date};
use crate::database::models::Priority;

pub mod collection; // GET, POST /api/projects
pub mod record; // GET, PUT, DELETE /api/projects/:project_id

pub use collection::get as projects_get;
pub use collection::post as projects_post;
pub use record::delete as project_delete;
pub use record::get as project_get;
pub use record::put as project_put;

const NAME_REQUIRED: &str = "Project name is required";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProject {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default, deserialize_with = "nullable_date")]
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProject {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default, deserialize_with = "patch_date")]
    pub due_date: Option<Option<DateTime<Utc>>>,
}
