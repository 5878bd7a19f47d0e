use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{assign, Priority};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    /// Set at creation, never rewritten.
    pub owner: Uuid,
    pub name: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewProject {
    pub owner: Uuid,
    pub name: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
}

/// Partial update. `None` leaves a field alone; `due_date: Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct ProjectChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl Project {
    /// Apply a partial update in place. Returns true if any field changed.
    pub fn apply(&mut self, changes: ProjectChanges) -> bool {
        let mut changed = false;
        if let Some(name) = changes.name {
            changed |= assign(&mut self.name, name);
        }
        if let Some(description) = changes.description {
            changed |= assign(&mut self.description, description);
        }
        if let Some(priority) = changes.priority {
            changed |= assign(&mut self.priority, priority);
        }
        if let Some(due_date) = changes.due_date {
            changed |= assign(&mut self.due_date, due_date);
        }
        changed
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner == user_id
    }
}
