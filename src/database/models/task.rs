use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::{assign, Priority, Project};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "To Do")]
    ToDo,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Done")]
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::ToDo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "To Do" => Ok(TaskStatus::ToDo),
            "In Progress" => Ok(TaskStatus::InProgress),
            "Done" => Ok(TaskStatus::Done),
            other => Err(format!("`{}` is not a valid status", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub project: Uuid,
    /// Copy of the parent project's owner taken at creation.
    pub owner: Uuid,
    pub title: String,
    pub description: String,
    pub note: String,
    pub status: TaskStatus,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a task. Only constructible from an already-authorized
/// project so the owner always mirrors the project's owner.
#[derive(Debug, Clone)]
pub struct NewTask {
    project: Uuid,
    owner: Uuid,
    pub title: String,
    pub description: String,
    pub note: String,
    pub status: TaskStatus,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
}

impl NewTask {
    pub fn under(project: &Project, title: impl Into<String>) -> Self {
        Self {
            project: project.id,
            owner: project.owner,
            title: title.into(),
            description: String::new(),
            note: String::new(),
            status: TaskStatus::default(),
            priority: Priority::default(),
            due_date: None,
        }
    }

    pub fn project(&self) -> Uuid {
        self.project
    }

    pub fn owner(&self) -> Uuid {
        self.owner
    }
}

#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub note: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl Task {
    /// Apply a partial update in place. Returns true if any field changed.
    pub fn apply(&mut self, changes: TaskChanges) -> bool {
        let mut changed = false;
        if let Some(title) = changes.title {
            changed |= assign(&mut self.title, title);
        }
        if let Some(description) = changes.description {
            changed |= assign(&mut self.description, description);
        }
        if let Some(note) = changes.note {
            changed |= assign(&mut self.note, note);
        }
        if let Some(status) = changes.status {
            changed |= assign(&mut self.status, status);
        }
        if let Some(priority) = changes.priority {
            changed |= assign(&mut self.priority, priority);
        }
        if let Some(due_date) = changes.due_date {
            changed |= assign(&mut self.due_date, due_date);
        }
        changed
    }
}
