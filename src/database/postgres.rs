use async_trait::async_trait;
use chrono::Utc;
use sqlx::{postgres::PgRow, PgPool, Row};
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewProject, NewTask, NewUser, Project, Task, User};
use crate::database::repository::{ProjectRepository, Store, TaskRepository, UserRepository};

const USER_COLUMNS: &str = "id, name, email, password_hash, created_at, updated_at";
const PROJECT_COLUMNS: &str =
    "id, owner_id, name, description, priority, due_date, created_at, updated_at";
const TASK_COLUMNS: &str = "id, project_id, owner_id, title, description, note, status, \
     priority, due_date, created_at, updated_at";

/// Map a foreign-key violation (SQLSTATE 23503) on insert to `MissingParent`,
/// naming the parent from the violated constraint.
fn missing_parent(err: sqlx::Error) -> DatabaseError {
    match err {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            let parent = match db.constraint() {
                Some(c) if c.contains("project") => "project",
                _ => "owner",
            };
            DatabaseError::MissingParent(parent.to_string())
        }
        other => DatabaseError::Sqlx(other),
    }
}

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn user_from_row(row: &PgRow) -> Result<User, DatabaseError> {
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn project_from_row(row: &PgRow) -> Result<Project, DatabaseError> {
    let priority: String = row.try_get("priority")?;
    Ok(Project {
        id: row.try_get("id")?,
        owner: row.try_get("owner_id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        priority: priority.parse().map_err(DatabaseError::Corrupt)?,
        due_date: row.try_get("due_date")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn task_from_row(row: &PgRow) -> Result<Task, DatabaseError> {
    let status: String = row.try_get("status")?;
    let priority: String = row.try_get("priority")?;
    Ok(Task {
        id: row.try_get("id")?,
        project: row.try_get("project_id")?,
        owner: row.try_get("owner_id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        note: row.try_get("note")?,
        status: status.parse().map_err(DatabaseError::Corrupt)?,
        priority: priority.parse().map_err(DatabaseError::Corrupt)?,
        due_date: row.try_get("due_date")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl UserRepository for PgStore {
    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO users (id, name, email, password_hash, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $5) RETURNING {}",
            USER_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(Uuid::new_v4())
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    DatabaseError::UniqueViolation("email".to_string())
                }
                other => DatabaseError::Sqlx(other),
            })?;

        user_from_row(&row)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let row = sqlx::query(&sql).bind(email).fetch_optional(&self.pool).await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn delete_account(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM tasks WHERE owner_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM projects WHERE owner_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;
        Ok(deleted > 0)
    }
}

#[async_trait]
impl ProjectRepository for PgStore {
    async fn create_project(&self, project: NewProject) -> Result<Project, DatabaseError> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO projects (id, owner_id, name, description, priority, due_date, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $7) RETURNING {}",
            PROJECT_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(Uuid::new_v4())
            .bind(project.owner)
            .bind(&project.name)
            .bind(&project.description)
            .bind(project.priority.as_str())
            .bind(project.due_date)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(missing_parent)?;

        project_from_row(&row)
    }

    async fn find_project(&self, id: Uuid) -> Result<Option<Project>, DatabaseError> {
        let sql = format!("SELECT {} FROM projects WHERE id = $1", PROJECT_COLUMNS);
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        row.as_ref().map(project_from_row).transpose()
    }

    async fn list_projects(&self, owner: Uuid) -> Result<Vec<Project>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM projects WHERE owner_id = $1 ORDER BY created_at DESC, id DESC",
            PROJECT_COLUMNS
        );
        let rows = sqlx::query(&sql).bind(owner).fetch_all(&self.pool).await?;
        rows.iter().map(project_from_row).collect()
    }

    async fn update_project(&self, project: &Project) -> Result<Project, DatabaseError> {
        let sql = format!(
            "UPDATE projects SET name = $2, description = $3, priority = $4, due_date = $5, updated_at = $6 \
             WHERE id = $1 RETURNING {}",
            PROJECT_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(project.id)
            .bind(&project.name)
            .bind(&project.description)
            .bind(project.priority.as_str())
            .bind(project.due_date)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Project not found".to_string()))?;

        project_from_row(&row)
    }

    async fn delete_project(&self, id: Uuid) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM tasks WHERE project_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl TaskRepository for PgStore {
    async fn create_task(&self, task: NewTask) -> Result<Task, DatabaseError> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO tasks (id, project_id, owner_id, title, description, note, status, priority, due_date, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10) RETURNING {}",
            TASK_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(Uuid::new_v4())
            .bind(task.project())
            .bind(task.owner())
            .bind(&task.title)
            .bind(&task.description)
            .bind(&task.note)
            .bind(task.status.as_str())
            .bind(task.priority.as_str())
            .bind(task.due_date)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(missing_parent)?;

        task_from_row(&row)
    }

    async fn find_task(
        &self,
        id: Uuid,
        project: Uuid,
        owner: Uuid,
    ) -> Result<Option<Task>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM tasks WHERE id = $1 AND project_id = $2 AND owner_id = $3",
            TASK_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(project)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(task_from_row).transpose()
    }

    async fn list_tasks(&self, project: Uuid, owner: Uuid) -> Result<Vec<Task>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM tasks WHERE project_id = $1 AND owner_id = $2 \
             ORDER BY created_at DESC, id DESC",
            TASK_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(project)
            .bind(owner)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(task_from_row).collect()
    }

    async fn update_task(&self, task: &Task) -> Result<Task, DatabaseError> {
        let sql = format!(
            "UPDATE tasks SET title = $2, description = $3, note = $4, status = $5, priority = $6, \
             due_date = $7, updated_at = $8 WHERE id = $1 RETURNING {}",
            TASK_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(task.id)
            .bind(&task.title)
            .bind(&task.description)
            .bind(&task.note)
            .bind(task.status.as_str())
            .bind(task.priority.as_str())
            .bind(task.due_date)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Task not found".to_string()))?;

        task_from_row(&row)
    }

    async fn delete_task(&self, id: Uuid) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
