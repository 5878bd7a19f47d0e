use async_trait::async_trait;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewProject, NewTask, NewUser, Project, Task, User};

/// Credential store
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `UniqueViolation` when the email is taken.
    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError>;

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;

    /// `email` must already be normalized.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    /// Remove the user and every project and task they own in one unit.
    /// Returns false when no such user exists.
    async fn delete_account(&self, id: Uuid) -> Result<bool, DatabaseError>;
}

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn create_project(&self, project: NewProject) -> Result<Project, DatabaseError>;

    async fn find_project(&self, id: Uuid) -> Result<Option<Project>, DatabaseError>;

    /// Newest first.
    async fn list_projects(&self, owner: Uuid) -> Result<Vec<Project>, DatabaseError>;

    /// Persist the mutable fields of `project`. The owner column is never written.
    async fn update_project(&self, project: &Project) -> Result<Project, DatabaseError>;

    /// Deletes the project and its tasks.
    async fn delete_project(&self, id: Uuid) -> Result<(), DatabaseError>;
}

#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn create_task(&self, task: NewTask) -> Result<Task, DatabaseError>;

    /// Looks a task up by id, scoped to both its project and its owner.
    async fn find_task(
        &self,
        id: Uuid,
        project: Uuid,
        owner: Uuid,
    ) -> Result<Option<Task>, DatabaseError>;

    /// Newest first.
    async fn list_tasks(&self, project: Uuid, owner: Uuid) -> Result<Vec<Task>, DatabaseError>;

    /// Persist the mutable fields of `task`. Project and owner are never written.
    async fn update_task(&self, task: &Task) -> Result<Task, DatabaseError>;

    async fn delete_task(&self, id: Uuid) -> Result<(), DatabaseError>;
}

/// Everything the API needs from a backing store
#[async_trait]
pub trait Store: UserRepository + ProjectRepository + TaskRepository {
    /// Round-trip to the backend, used by the health check
    async fn ping(&self) -> Result<(), DatabaseError>;
}
