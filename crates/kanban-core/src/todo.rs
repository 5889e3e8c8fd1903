use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub id: String,
    pub column_id: String,
    pub title: String,
    pub description: String,
    /// Name of the column the todo currently sits in.
    pub status: String,
    /// Ids of the todo's subtodos, in creation order.
    #[serde(default, deserialize_with = "crate::null_as_default")]
    pub subtodos: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTodo {
    #[serde(default, deserialize_with = "crate::null_as_default")]
    pub column_id: String,
    #[serde(default, deserialize_with = "crate::null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "crate::null_as_default")]
    pub description: String,
}

/// Partial update. `status` moves the todo to the column of that name on
/// the same board.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTodo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl UpdateTodo {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.status.is_none()
    }
}
