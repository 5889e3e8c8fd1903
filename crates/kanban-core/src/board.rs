use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: String,
    pub name: String,
    /// Ids of the board's columns, in display order.
    #[serde(default, deserialize_with = "crate::null_as_default")]
    pub columns: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateBoard {
    #[serde(default, deserialize_with = "crate::null_as_default")]
    pub name: String,
    /// Names of columns to create alongside the board.
    #[serde(default, deserialize_with = "crate::null_as_default")]
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBoard {
    #[serde(default, deserialize_with = "crate::null_as_default")]
    pub name: String,
}
