use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtodo {
    pub id: String,
    pub todo_id: String,
    pub title: String,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateSubtodo {
    #[serde(default, deserialize_with = "crate::null_as_default")]
    pub todo_id: String,
    #[serde(default, deserialize_with = "crate::null_as_default")]
    pub title: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSubtodo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
}

impl UpdateSubtodo {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.is_completed.is_none()
    }
}

/// Number of completed items in a checklist.
pub fn completed_count(items: &[Subtodo]) -> usize {
    items.iter().filter(|s| s.is_completed).count()
}
