use async_trait::async_trait;
use kanban_core::board::{CreateBoard, UpdateBoard};
use kanban_core::column::{CreateColumn, ReplaceColumns, UpdateColumn};
use kanban_core::subtodo::{CreateSubtodo, UpdateSubtodo};
use kanban_core::todo::{CreateTodo, UpdateTodo};
use kanban_core::{Board, Column, KanbanError, Subtodo, Todo};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// The human-readable message without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            ServiceError::NotFound(m)
            | ServiceError::Conflict(m)
            | ServiceError::InvalidInput(m)
            | ServiceError::Internal(m) => m,
        }
    }

    /// Stable machine-readable code, used in error envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::NotFound(_) => "not_found",
            ServiceError::Conflict(_) => "conflict",
            ServiceError::InvalidInput(_) => "bad_request",
            ServiceError::Internal(_) => "internal",
        }
    }

    pub fn from_code(code: &str, message: String) -> Self {
        match code {
            "not_found" => ServiceError::NotFound(message),
            "conflict" => ServiceError::Conflict(message),
            "bad_request" => ServiceError::InvalidInput(message),
            _ => ServiceError::Internal(message),
        }
    }
}

impl From<KanbanError> for ServiceError {
    fn from(e: KanbanError) -> Self {
        match e {
            KanbanError::NotFound(m) => ServiceError::NotFound(m),
            KanbanError::InvalidInput(m) => ServiceError::InvalidInput(m),
            KanbanError::Conflict(m) => ServiceError::Conflict(m),
        }
    }
}

/// Board, column, todo and subtodo operations.
///
/// `LocalService` runs the checks against a `Database` directly.
/// `HttpService` talks to a running kanban-server.
///
/// Unscoped list operations report `NotFound` when there is nothing to
/// list, and so do the delete-all operations.
#[async_trait]
pub trait KanbanService: Send + Sync {
    // -- Boards --
    async fn list_boards(&self) -> Result<Vec<Board>, ServiceError>;
    async fn get_board(&self, id: &str) -> Result<Board, ServiceError>;
    async fn create_board(&self, input: &CreateBoard) -> Result<Board, ServiceError>;
    async fn update_board(&self, id: &str, update: &UpdateBoard) -> Result<Board, ServiceError>;
    async fn delete_board(&self, id: &str) -> Result<Board, ServiceError>;
    async fn delete_all_boards(&self) -> Result<usize, ServiceError>;
    async fn list_board_columns(&self, board_id: &str) -> Result<Vec<Column>, ServiceError>;
    async fn replace_board_columns(
        &self,
        board_id: &str,
        input: &ReplaceColumns,
    ) -> Result<Vec<Column>, ServiceError>;

    // -- Columns --
    async fn list_columns(&self) -> Result<Vec<Column>, ServiceError>;
    async fn get_column(&self, id: &str) -> Result<Column, ServiceError>;
    async fn create_column(&self, input: &CreateColumn) -> Result<Column, ServiceError>;
    async fn update_column(&self, id: &str, update: &UpdateColumn)
        -> Result<Column, ServiceError>;
    async fn delete_column(&self, id: &str) -> Result<Column, ServiceError>;
    async fn delete_all_columns(&self) -> Result<usize, ServiceError>;
    async fn list_column_todos(&self, column_id: &str) -> Result<Vec<Todo>, ServiceError>;

    // -- Todos --
    async fn list_todos(&self) -> Result<Vec<Todo>, ServiceError>;
    async fn get_todo(&self, id: &str) -> Result<Todo, ServiceError>;
    async fn create_todo(&self, input: &CreateTodo) -> Result<Todo, ServiceError>;
    async fn update_todo(&self, id: &str, update: &UpdateTodo) -> Result<Todo, ServiceError>;
    async fn delete_todo(&self, id: &str) -> Result<Todo, ServiceError>;
    async fn delete_all_todos(&self) -> Result<usize, ServiceError>;
    async fn list_todo_subtodos(&self, todo_id: &str) -> Result<Vec<Subtodo>, ServiceError>;

    // -- Subtodos --
    async fn list_subtodos(&self) -> Result<Vec<Subtodo>, ServiceError>;
    async fn get_subtodo(&self, id: &str) -> Result<Subtodo, ServiceError>;
    async fn create_subtodo(&self, input: &CreateSubtodo) -> Result<Subtodo, ServiceError>;
    async fn update_subtodo(
        &self,
        id: &str,
        update: &UpdateSubtodo,
    ) -> Result<Subtodo, ServiceError>;
    async fn toggle_subtodo(&self, id: &str) -> Result<Subtodo, ServiceError>;
    async fn delete_subtodo(&self, id: &str) -> Result<Subtodo, ServiceError>;
    async fn delete_all_subtodos(&self) -> Result<usize, ServiceError>;
}
