//! Ownership authorization for projects and tasks.
//!
//! The only rule is `record.owner == subject`. Projects are checked for
//! existence before ownership, so a stranger's project answers 403 while a
//! missing one answers 404. Individual tasks collapse both cases: they are
//! looked up with the owner already in the filter, and a task reached through
//! someone else's project is reported as missing rather than forbidden.

use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Project, Task};
use crate::database::repository::{ProjectRepository, TaskRepository};

#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    #[error("project not found")]
    ProjectNotFound,

    #[error("project belongs to another user")]
    NotProjectOwner,

    #[error("task not found")]
    TaskNotFound,

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Parse a path identifier. Anything that is not a UUID cannot name a record.
fn parse_id(raw: &str, missing: AccessError) -> Result<Uuid, AccessError> {
    Uuid::parse_str(raw.trim()).map_err(|_| missing)
}

/// Load a project the subject owns.
pub async fn authorize_project<R>(
    projects: &R,
    project_id: &str,
    subject: Uuid,
) -> Result<Project, AccessError>
where
    R: ProjectRepository + ?Sized,
{
    let id = parse_id(project_id, AccessError::ProjectNotFound)?;

    let project = projects
        .find_project(id)
        .await?
        .ok_or(AccessError::ProjectNotFound)?;

    if !project.is_owned_by(subject) {
        tracing::warn!("User {} denied access to project {}", subject, project.id);
        return Err(AccessError::NotProjectOwner);
    }

    Ok(project)
}

/// Load a task under a project, both owned by the subject.
pub async fn authorize_task<R>(
    store: &R,
    project_id: &str,
    task_id: &str,
    subject: Uuid,
) -> Result<(Project, Task), AccessError>
where
    R: ProjectRepository + TaskRepository + ?Sized,
{
    let project = match authorize_project(store, project_id, subject).await {
        Ok(project) => project,
        Err(AccessError::NotProjectOwner) => return Err(AccessError::TaskNotFound),
        Err(other) => return Err(other),
    };
    let id = parse_id(task_id, AccessError::TaskNotFound)?;

    let task = store
        .find_task(id, project.id, subject)
        .await?
        .ok_or(AccessError::TaskNotFound)?;

    Ok((project, task))
}
