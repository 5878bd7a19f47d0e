use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewProject, NewTask, NewUser, Project, Task, User};
use crate::database::repository::{ProjectRepository, Store, TaskRepository, UserRepository};

/// Rows tagged with an insertion sequence so listings stay newest-first even
/// when two records share a timestamp.
struct Row<T> {
    seq: u64,
    value: T,
}

#[derive(Default)]
struct Tables {
    next_seq: u64,
    users: HashMap<Uuid, Row<User>>,
    projects: HashMap<Uuid, Row<Project>>,
    tasks: HashMap<Uuid, Row<Task>>,
}

impl Tables {
    fn seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }
}

fn newest_first<T: Clone>(mut rows: Vec<&Row<T>>) -> Vec<T> {
    rows.sort_by(|a, b| b.seq.cmp(&a.seq));
    rows.into_iter().map(|r| r.value.clone()).collect()
}

/// Process-local store used by tests and `memory://` deployments
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let mut tables = self.inner.write().await;
        if tables.users.values().any(|r| r.value.email == user.email) {
            return Err(DatabaseError::UniqueViolation("email".to_string()));
        }

        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        let seq = tables.seq();
        tables.users.insert(created.id, Row { seq, value: created.clone() });
        Ok(created)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let tables = self.inner.read().await;
        Ok(tables.users.get(&id).map(|r| r.value.clone()))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.inner.read().await;
        Ok(tables
            .users
            .values()
            .find(|r| r.value.email == email)
            .map(|r| r.value.clone()))
    }

    async fn delete_account(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let mut tables = self.inner.write().await;
        tables.tasks.retain(|_, r| r.value.owner != id);
        tables.projects.retain(|_, r| r.value.owner != id);
        Ok(tables.users.remove(&id).is_some())
    }
}

#[async_trait]
impl ProjectRepository for MemoryStore {
    async fn create_project(&self, project: NewProject) -> Result<Project, DatabaseError> {
        let mut tables = self.inner.write().await;
        if !tables.users.contains_key(&project.owner) {
            return Err(DatabaseError::MissingParent("owner".to_string()));
        }

        let now = Utc::now();
        let created = Project {
            id: Uuid::new_v4(),
            owner: project.owner,
            name: project.name,
            description: project.description,
            priority: project.priority,
            due_date: project.due_date,
            created_at: now,
            updated_at: now,
        };
        let seq = tables.seq();
        tables.projects.insert(created.id, Row { seq, value: created.clone() });
        Ok(created)
    }

    async fn find_project(&self, id: Uuid) -> Result<Option<Project>, DatabaseError> {
        let tables = self.inner.read().await;
        Ok(tables.projects.get(&id).map(|r| r.value.clone()))
    }

    async fn list_projects(&self, owner: Uuid) -> Result<Vec<Project>, DatabaseError> {
        let tables = self.inner.read().await;
        Ok(newest_first(
            tables.projects.values().filter(|r| r.value.owner == owner).collect(),
        ))
    }

    async fn update_project(&self, project: &Project) -> Result<Project, DatabaseError> {
        let mut tables = self.inner.write().await;
        let row = tables
            .projects
            .get_mut(&project.id)
            .ok_or_else(|| DatabaseError::NotFound("Project not found".to_string()))?;

        let stored = &mut row.value;
        stored.name = project.name.clone();
        stored.description = project.description.clone();
        stored.priority = project.priority;
        stored.due_date = project.due_date;
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn delete_project(&self, id: Uuid) -> Result<(), DatabaseError> {
        let mut tables = self.inner.write().await;
        tables.tasks.retain(|_, r| r.value.project != id);
        tables.projects.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl TaskRepository for MemoryStore {
    async fn create_task(&self, task: NewTask) -> Result<Task, DatabaseError> {
        let mut tables = self.inner.write().await;
        if !tables.users.contains_key(&task.owner()) {
            return Err(DatabaseError::MissingParent("owner".to_string()));
        }
        if !tables.projects.contains_key(&task.project()) {
            return Err(DatabaseError::MissingParent("project".to_string()));
        }

        let now = Utc::now();
        let created = Task {
            id: Uuid::new_v4(),
            project: task.project(),
            owner: task.owner(),
            title: task.title,
            description: task.description,
            note: task.note,
            status: task.status,
            priority: task.priority,
            due_date: task.due_date,
            created_at: now,
            updated_at: now,
        };
        let seq = tables.seq();
        tables.tasks.insert(created.id, Row { seq, value: created.clone() });
        Ok(created)
    }

    async fn find_task(
        &self,
        id: Uuid,
        project: Uuid,
        owner: Uuid,
    ) -> Result<Option<Task>, DatabaseError> {
        let tables = self.inner.read().await;
        Ok(tables
            .tasks
            .get(&id)
            .filter(|r| r.value.project == project && r.value.owner == owner)
            .map(|r| r.value.clone()))
    }

    async fn list_tasks(&self, project: Uuid, owner: Uuid) -> Result<Vec<Task>, DatabaseError> {
        let tables = self.inner.read().await;
        Ok(newest_first(
            tables
                .tasks
                .values()
                .filter(|r| r.value.project == project && r.value.owner == owner)
                .collect(),
        ))
    }

    async fn update_task(&self, task: &Task) -> Result<Task, DatabaseError> {
        let mut tables = self.inner.write().await;
        let row = tables
            .tasks
            .get_mut(&task.id)
            .ok_or_else(|| DatabaseError::NotFound("Task not found".to_string()))?;

        let stored = &mut row.value;
        stored.title = task.title.clone();
        stored.description = task.description.clone();
        stored.note = task.note.clone();
        stored.status = task.status;
        stored.priority = task.priority;
        stored.due_date = task.due_date;
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn delete_task(&self, id: Uuid) -> Result<(), DatabaseError> {
        self.inner.write().await.tasks.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::Priority;

    async fn user(store: &MemoryStore, email: &str) -> User {
        store
            .create_user(NewUser {
                name: "Test".into(),
                email: email.into(),
                password_hash: "hash".into(),
            })
            .await
            .unwrap()
    }

    async fn project(store: &MemoryStore, owner: Uuid, name: &str) -> Project {
        store
            .create_project(NewProject {
                owner,
                name: name.into(),
                description: String::new(),
                priority: Priority::Medium,
                due_date: None,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn rejects_duplicate_email() {
        let store = MemoryStore::new();
        user(&store, "ann@x.com").await;
        let err = store
            .create_user(NewUser {
                name: "Other".into(),
                email: "ann@x.com".into(),
                password_hash: "hash".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::UniqueViolation(_)));
    }

    #[tokio::test]
    async fn lists_newest_first() {
        let store = MemoryStore::new();
        let ann = user(&store, "ann@x.com").await;
        let first = project(&store, ann.id, "first").await;
        let second = project(&store, ann.id, "second").await;

        let listed = store.list_projects(ann.id).await.unwrap();
        assert_eq!(listed.iter().map(|p| p.id).collect::<Vec<_>>(), vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn update_never_touches_owner() {
        let store = MemoryStore::new();
        let ann = user(&store, "ann@x.com").await;
        let mut p = project(&store, ann.id, "P1").await;

        p.owner = Uuid::new_v4();
        p.name = "Renamed".into();
        let updated = store.update_project(&p).await.unwrap();
        assert_eq!(updated.owner, ann.id);
        assert_eq!(updated.name, "Renamed");
    }

    #[tokio::test]
    async fn deleting_project_removes_its_tasks() {
        let store = MemoryStore::new();
        let ann = user(&store, "ann@x.com").await;
        let p = project(&store, ann.id, "P1").await;
        let task = store.create_task(NewTask::under(&p, "T1")).await.unwrap();

        store.delete_project(p.id).await.unwrap();
        assert!(store.find_project(p.id).await.unwrap().is_none());
        assert!(store.find_task(task.id, p.id, ann.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn deleting_account_cascades() {
        let store = MemoryStore::new();
        let ann = user(&store, "ann@x.com").await;
        let bob = user(&store, "bob@x.com").await;
        let anns = project(&store, ann.id, "A").await;
        let bobs = project(&store, bob.id, "B").await;
        store.create_task(NewTask::under(&anns, "T")).await.unwrap();

        assert!(store.delete_account(ann.id).await.unwrap());
        assert!(store.find_user(ann.id).await.unwrap().is_none());
        assert!(store.list_projects(ann.id).await.unwrap().is_empty());
        assert!(store.list_tasks(anns.id, ann.id).await.unwrap().is_empty());
        assert!(store.find_project(bobs.id).await.unwrap().is_some());

        assert!(!store.delete_account(ann.id).await.unwrap());
    }

    #[tokio::test]
    async fn project_needs_an_existing_owner() {
        let store = MemoryStore::new();
        let ann = user(&store, "ann@x.com").await;
        store.delete_account(ann.id).await.unwrap();

        let err = store
            .create_project(NewProject {
                owner: ann.id,
                name: "ghost".into(),
                description: String::new(),
                priority: Priority::Medium,
                due_date: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::MissingParent(ref parent) if parent == "owner"));
        assert!(store.list_projects(ann.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn task_needs_an_existing_project() {
        let store = MemoryStore::new();
        let ann = user(&store, "ann@x.com").await;
        let p = project(&store, ann.id, "P1").await;
        store.delete_project(p.id).await.unwrap();

        let err = store.create_task(NewTask::under(&p, "T")).await.unwrap_err();
        assert!(matches!(err, DatabaseError::MissingParent(ref parent) if parent == "project"));
        assert!(store.list_tasks(p.id, ann.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn find_task_is_scoped_by_project_and_owner() {
        let store = MemoryStore::new();
        let ann = user(&store, "ann@x.com").await;
        let p1 = project(&store, ann.id, "P1").await;
        let p2 = project(&store, ann.id, "P2").await;
        let task = store.create_task(NewTask::under(&p1, "T")).await.unwrap();

        assert!(store.find_task(task.id, p1.id, ann.id).await.unwrap().is_some());
        assert!(store.find_task(task.id, p2.id, ann.id).await.unwrap().is_none());
        assert!(store.find_task(task.id, p1.id, Uuid::new_v4()).await.unwrap().is_none());
    }
}
