use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    pub board_id: String,
    pub name: String,
    pub position: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateColumn {
    #[serde(default, deserialize_with = "crate::null_as_default")]
    pub board_id: String,
    #[serde(default, deserialize_with = "crate::null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateColumn {
    #[serde(default, deserialize_with = "crate::null_as_default")]
    pub name: String,
}

/// One row of an edited column list. Rows without an id are new columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "crate::null_as_default")]
    pub name: String,
}

impl ColumnDraft {
    pub fn blank() -> Self {
        Self::default()
    }
}

impl From<&Column> for ColumnDraft {
    fn from(column: &Column) -> Self {
        Self {
            id: Some(column.id.clone()),
            name: column.name.clone(),
        }
    }
}

/// Replacement column set for a board, in display order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplaceColumns {
    #[serde(default, deserialize_with = "crate::null_as_default")]
    pub columns: Vec<ColumnDraft>,
}
