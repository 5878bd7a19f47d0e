pub mod project;
pub mod task;
pub mod user;

pub use project::{NewProject, Project, ProjectChanges};
pub use task::{NewTask, Task, TaskChanges, TaskStatus};
pub use user::{NewUser, User, UserInfo};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Priority shared by projects and tasks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!("`{}` is not a valid priority", other)),
        }
    }
}

/// Replace `slot` with `value` when they differ, reporting whether it changed.
pub(crate) fn assign<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_wire_names() {
        assert_eq!(serde_json::to_value(Priority::High).unwrap(), "high");
        assert_eq!(Priority::default(), Priority::Medium);
        assert_eq!("low".parse::<Priority>().unwrap(), Priority::Low);
        assert!("urgent".parse::<Priority>().is_err());
    }
}
