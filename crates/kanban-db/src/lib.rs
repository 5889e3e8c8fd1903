#[cfg(feature = "sqlite")]
pub mod sqlite;

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use kanban_core::board::CreateBoard;
use kanban_core::column::{ColumnDraft, CreateColumn};
use kanban_core::subtodo::{CreateSubtodo, UpdateSubtodo};
use kanban_core::todo::CreateTodo;
use kanban_core::{Board, Column, Subtodo, Todo};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal: {0}")]
    Internal(String),
}

/// Where the database lives.
#[derive(Debug, Clone, Default)]
pub struct DbConfig {
    /// Path to the SQLite file. Falls back to `data_dir()/kanban.db`.
    pub sqlite_path: Option<String>,
}

/// Resolved field changes for a todo. `column_id` moves the todo.
#[derive(Debug, Clone, Default)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub column_id: Option<String>,
}

/// Storage operations for boards, columns, todos and subtodos.
///
/// Every delete that owns children removes them in the same transaction:
/// board -> columns -> todos -> subtodos.
#[async_trait]
pub trait Database: Send + Sync {
    // -- Boards --
    async fn create_board(&self, input: &CreateBoard) -> Result<Board, DbError>;
    async fn get_board(&self, id: &str) -> Result<Board, DbError>;
    async fn find_board_by_name(&self, name: &str) -> Result<Option<Board>, DbError>;
    async fn list_boards(&self) -> Result<Vec<Board>, DbError>;
    async fn update_board(&self, id: &str, name: &str) -> Result<Board, DbError>;
    /// Returns the board as it was before deletion.
    async fn delete_board(&self, id: &str) -> Result<Board, DbError>;
    /// Returns the number of boards removed.
    async fn delete_all_boards(&self) -> Result<usize, DbError>;

    // -- Columns --
    async fn create_column(&self, input: &CreateColumn) -> Result<Column, DbError>;
    async fn get_column(&self, id: &str) -> Result<Column, DbError>;
    async fn find_column_by_name(
        &self,
        board_id: &str,
        name: &str,
    ) -> Result<Option<Column>, DbError>;
    async fn list_columns(&self) -> Result<Vec<Column>, DbError>;
    async fn list_board_columns(&self, board_id: &str) -> Result<Vec<Column>, DbError>;
    async fn update_column(&self, id: &str, name: &str) -> Result<Column, DbError>;
    async fn replace_board_columns(
        &self,
        board_id: &str,
        drafts: &[ColumnDraft],
    ) -> Result<Vec<Column>, DbError>;
    async fn delete_column(&self, id: &str) -> Result<Column, DbError>;
    async fn delete_all_columns(&self) -> Result<usize, DbError>;

    // -- Todos --
    async fn create_todo(&self, input: &CreateTodo) -> Result<Todo, DbError>;
    async fn get_todo(&self, id: &str) -> Result<Todo, DbError>;
    async fn list_todos(&self) -> Result<Vec<Todo>, DbError>;
    async fn list_column_todos(&self, column_id: &str) -> Result<Vec<Todo>, DbError>;
    async fn update_todo(&self, id: &str, changes: &TodoChanges) -> Result<Todo, DbError>;
    async fn delete_todo(&self, id: &str) -> Result<Todo, DbError>;
    async fn delete_all_todos(&self) -> Result<usize, DbError>;

    // -- Subtodos --
    async fn create_subtodo(&self, input: &CreateSubtodo) -> Result<Subtodo, DbError>;
    async fn get_subtodo(&self, id: &str) -> Result<Subtodo, DbError>;
    async fn list_subtodos(&self) -> Result<Vec<Subtodo>, DbError>;
    async fn list_todo_subtodos(&self, todo_id: &str) -> Result<Vec<Subtodo>, DbError>;
    async fn update_subtodo(
        &self,
        id: &str,
        update: &UpdateSubtodo,
    ) -> Result<Subtodo, DbError>;
    async fn toggle_subtodo(&self, id: &str) -> Result<Subtodo, DbError>;
    async fn delete_subtodo(&self, id: &str) -> Result<Subtodo, DbError>;
    async fn delete_all_subtodos(&self) -> Result<usize, DbError>;
}

/// Default data directory: `$XDG_DATA_HOME/kanban`, else `~/.local/share/kanban`.
pub fn data_dir() -> PathBuf {
    let base = if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg)
    } else if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".local/share")
    } else {
        PathBuf::from(".")
    };
    base.join("kanban")
}
