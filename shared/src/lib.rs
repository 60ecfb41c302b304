use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    /// Wire name, as used in JSON and form values.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown priority `{0}`")]
pub struct UnknownPriority(pub String);

impl FromStr for Priority {
    type Err = UnknownPriority;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(UnknownPriority(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub completed: bool,
    pub created_at: String,
}

/// Payload sent when creating or replacing a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("title must not be empty")]
    EmptyTitle,
}

impl TaskDraft {
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.title.trim().is_empty() {
            return Err(DraftError::EmptyTitle);
        }
        Ok(())
    }
}

impl Task {
    pub fn new(id: u64, draft: TaskDraft, created_at: String) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            priority: draft.priority,
            completed: false,
            created_at,
        }
    }

    /// Replaces the editable fields, keeping identity, completion and creation time.
    pub fn with_draft(self, draft: TaskDraft) -> Self {
        Self {
            title: draft.title,
            description: draft.description,
            priority: draft.priority,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str) -> TaskDraft {
        TaskDraft {
            title: title.to_string(),
            description: None,
            priority: Priority::High,
        }
    }

    #[test]
    fn task_json_matches_wire_shape() {
        let json = r#"{"id":7,"title":"Write docs","description":null,"priority":"high","completed":false,"created_at":"2024-03-05T14:07:00Z"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.id, 7);
        assert_eq!(task.description, None);
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.created_at, "2024-03-05T14:07:00Z");
    }

    #[test]
    fn draft_omits_missing_description() {
        let body = serde_json::to_value(draft("Ship it")).unwrap();
        assert_eq!(body, serde_json::json!({"title": "Ship it", "priority": "high"}));
    }

    #[test]
    fn draft_priority_defaults_to_medium() {
        let parsed: TaskDraft = serde_json::from_str(r#"{"title":"x"}"#).unwrap();
        assert_eq!(parsed.priority, Priority::Medium);
    }

    #[test]
    fn blank_title_is_rejected() {
        assert_eq!(draft("   ").validate(), Err(DraftError::EmptyTitle));
        assert!(draft("ok").validate().is_ok());
    }

    #[test]
    fn priority_parses_wire_names_only() {
        for priority in Priority::ALL {
            assert_eq!(priority.as_str().parse::<Priority>(), Ok(priority));
        }
        assert!("urgent".parse::<Priority>().is_err());
        assert_eq!(Priority::Medium.label(), "Medium");
    }

    #[test]
    fn with_draft_keeps_identity_and_state() {
        let mut task = Task::new(3, draft("Old"), "2024-01-01T00:00:00Z".into());
        task.completed = true;
        let updated = task.with_draft(TaskDraft {
            title: "New".into(),
            description: Some("details".into()),
            priority: Priority::Low,
        });
        assert_eq!(updated.id, 3);
        assert!(updated.completed);
        assert_eq!(updated.created_at, "2024-01-01T00:00:00Z");
        assert_eq!(updated.title, "New");
        assert_eq!(updated.priority, Priority::Low);
    }
}
