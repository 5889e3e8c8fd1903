use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use kanban_core::board::{CreateBoard, UpdateBoard};
use kanban_core::column::{ColumnDraft, CreateColumn, ReplaceColumns, UpdateColumn};
use kanban_core::subtodo::{CreateSubtodo, UpdateSubtodo};
use kanban_core::todo::{CreateTodo, UpdateTodo};
use kanban_core::{require_field, Board, Column, Subtodo, Todo};
use kanban_db::{Database, DbError, TodoChanges};

use crate::{KanbanService, ServiceError};

/// Local implementation backed by direct database access.
///
/// This is where the resource rules live: required fields, name uniqueness,
/// parent existence and the "nothing to list" responses.
pub struct LocalService {
    db: Arc<dyn Database>,
}

impl LocalService {
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self { db }
    }

    async fn require_board(&self, id: &str) -> Result<Board, ServiceError> {
        self.db.get_board(id).await.map_err(missing("board"))
    }

    async fn require_column(&self, id: &str) -> Result<Column, ServiceError> {
        self.db.get_column(id).await.map_err(missing("column"))
    }

    async fn require_todo(&self, id: &str) -> Result<Todo, ServiceError> {
        self.db.get_todo(id).await.map_err(missing("todo"))
    }
}

impl From<DbError> for ServiceError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound(msg) => ServiceError::NotFound(msg),
            DbError::Conflict(msg) => ServiceError::Conflict(msg),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

/// Map a storage lookup failure to the "No <entity> found" message.
fn missing(entity: &'static str) -> impl FnOnce(DbError) -> ServiceError {
    move |e| match e {
        DbError::NotFound(_) => ServiceError::NotFound(format!("No {entity} found")),
        other => other.into(),
    }
}

/// Map a storage uniqueness failure to the "<Entity> already exists" message.
fn taken(entity: &'static str) -> impl FnOnce(DbError) -> ServiceError {
    move |e| match e {
        DbError::Conflict(_) => ServiceError::Conflict(format!("{entity} already exists")),
        other => other.into(),
    }
}

fn non_empty<T>(items: Vec<T>, plural: &str) -> Result<Vec<T>, ServiceError> {
    if items.is_empty() {
        return Err(ServiceError::NotFound(format!("No {plural} found")));
    }
    Ok(items)
}

fn deleted_any(count: usize, plural: &str) -> Result<usize, ServiceError> {
    if count == 0 {
        return Err(ServiceError::NotFound(format!("No {plural} found")));
    }
    Ok(count)
}

/// Trim and validate a list of column names; blanks and repeats are rejected.
fn clean_column_names<'a, I>(names: I) -> Result<Vec<String>, ServiceError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    let mut cleaned = Vec::new();
    for name in names {
        let name = require_field("Column name", name)?.to_string();
        if !seen.insert(name.clone()) {
            return Err(ServiceError::InvalidInput(format!(
                "Duplicate column name: {name}"
            )));
        }
        cleaned.push(name);
    }
    Ok(cleaned)
}

#[async_trait]
impl KanbanService for LocalService {
    // -- Boards --

    async fn list_boards(&self) -> Result<Vec<Board>, ServiceError> {
        non_empty(self.db.list_boards().await?, "boards")
    }

    async fn get_board(&self, id: &str) -> Result<Board, ServiceError> {
        self.require_board(id).await
    }

    async fn create_board(&self, input: &CreateBoard) -> Result<Board, ServiceError> {
        let name = require_field("Name", &input.name)?.to_string();
        let columns = clean_column_names(input.columns.iter().map(String::as_str))?;

        if self.db.find_board_by_name(&name).await?.is_some() {
            return Err(ServiceError::Conflict("Board already exists".into()));
        }

        self.db
            .create_board(&CreateBoard { name, columns })
            .await
            .map_err(taken("Board"))
    }

    async fn update_board(&self, id: &str, update: &UpdateBoard) -> Result<Board, ServiceError> {
        let name = require_field("Name", &update.name)?;
        self.require_board(id).await?;

        if let Some(other) = self.db.find_board_by_name(name).await? {
            if other.id != id {
                return Err(ServiceError::Conflict("Board already exists".into()));
            }
        }

        self.db
            .update_board(id, name)
            .await
            .map_err(missing("board"))
            .map_err(|e| match e {
                ServiceError::Conflict(_) => ServiceError::Conflict("Board already exists".into()),
                other => other,
            })
    }

    async fn delete_board(&self, id: &str) -> Result<Board, ServiceError> {
        self.db.delete_board(id).await.map_err(missing("board"))
    }

    async fn delete_all_boards(&self) -> Result<usize, ServiceError> {
        deleted_any(self.db.delete_all_boards().await?, "boards")
    }

    async fn list_board_columns(&self, board_id: &str) -> Result<Vec<Column>, ServiceError> {
        self.require_board(board_id).await?;
        Ok(self.db.list_board_columns(board_id).await?)
    }

    async fn replace_board_columns(
        &self,
        board_id: &str,
        input: &ReplaceColumns,
    ) -> Result<Vec<Column>, ServiceError> {
        self.require_board(board_id).await?;
        let names = clean_column_names(input.columns.iter().map(|d| d.name.as_str()))?;
        let drafts: Vec<ColumnDraft> = input
            .columns
            .iter()
            .zip(names)
            .map(|(draft, name)| ColumnDraft {
                id: draft.id.clone(),
                name,
            })
            .collect();

        self.db
            .replace_board_columns(board_id, &drafts)
            .await
            .map_err(missing("column"))
    }

    // -- Columns --

    async fn list_columns(&self) -> Result<Vec<Column>, ServiceError> {
        non_empty(self.db.list_columns().await?, "columns")
    }

    async fn get_column(&self, id: &str) -> Result<Column, ServiceError> {
        self.require_column(id).await
    }

    async fn create_column(&self, input: &CreateColumn) -> Result<Column, ServiceError> {
        let name = require_field("Name", &input.name)?.to_string();
        let board_id = require_field("Board id", &input.board_id)?.to_string();
        self.require_board(&board_id).await?;

        if self.db.find_column_by_name(&board_id, &name).await?.is_some() {
            return Err(ServiceError::Conflict("Column already exists".into()));
        }

        self.db
            .create_column(&CreateColumn { board_id, name })
            .await
            .map_err(taken("Column"))
    }

    async fn update_column(
        &self,
        id: &str,
        update: &UpdateColumn,
    ) -> Result<Column, ServiceError> {
        let name = require_field("Name", &update.name)?;
        let column = self.require_column(id).await?;

        if let Some(other) = self.db.find_column_by_name(&column.board_id, name).await? {
            if other.id != id {
                return Err(ServiceError::Conflict("Column already exists".into()));
            }
        }

        self.db
            .update_column(id, name)
            .await
            .map_err(missing("column"))
            .map_err(|e| match e {
                ServiceError::Conflict(_) => ServiceError::Conflict("Column already exists".into()),
                other => other,
            })
    }

    async fn delete_column(&self, id: &str) -> Result<Column, ServiceError> {
        self.db.delete_column(id).await.map_err(missing("column"))
    }

    async fn delete_all_columns(&self) -> Result<usize, ServiceError> {
        deleted_any(self.db.delete_all_columns().await?, "columns")
    }

    async fn list_column_todos(&self, column_id: &str) -> Result<Vec<Todo>, ServiceError> {
        self.require_column(column_id).await?;
        Ok(self.db.list_column_todos(column_id).await?)
    }

    // -- Todos --

    async fn list_todos(&self) -> Result<Vec<Todo>, ServiceError> {
        non_empty(self.db.list_todos().await?, "todos")
    }

    async fn get_todo(&self, id: &str) -> Result<Todo, ServiceError> {
        self.require_todo(id).await
    }

    async fn create_todo(&self, input: &CreateTodo) -> Result<Todo, ServiceError> {
        let title = require_field("Title", &input.title)?.to_string();
        let column_id = require_field("Column id", &input.column_id)?.to_string();
        self.require_column(&column_id).await?;

        Ok(self
            .db
            .create_todo(&CreateTodo {
                column_id,
                title,
                description: input.description.clone(),
            })
            .await?)
    }

    async fn update_todo(&self, id: &str, update: &UpdateTodo) -> Result<Todo, ServiceError> {
        if update.is_empty() {
            return Err(ServiceError::InvalidInput("Nothing to update".into()));
        }
        let title = update
            .title
            .as_deref()
            .map(|t| require_field("Title", t).map(str::to_string))
            .transpose()?;
        let todo = self.require_todo(id).await?;

        let column_id = match update.status.as_deref() {
            Some(status) if status == todo.status => None,
            Some(status) => {
                let current = self.require_column(&todo.column_id).await?;
                let target = self
                    .db
                    .find_column_by_name(&current.board_id, status)
                    .await?
                    .ok_or_else(|| ServiceError::InvalidInput("Unknown status".into()))?;
                Some(target.id)
            }
            None => None,
        };

        let changes = TodoChanges {
            title,
            description: update.description.clone(),
            column_id,
        };
        self.db.update_todo(id, &changes).await.map_err(missing("todo"))
    }

    async fn delete_todo(&self, id: &str) -> Result<Todo, ServiceError> {
        self.db.delete_todo(id).await.map_err(missing("todo"))
    }

    async fn delete_all_todos(&self) -> Result<usize, ServiceError> {
        deleted_any(self.db.delete_all_todos().await?, "todos")
    }

    async fn list_todo_subtodos(&self, todo_id: &str) -> Result<Vec<Subtodo>, ServiceError> {
        self.require_todo(todo_id).await?;
        Ok(self.db.list_todo_subtodos(todo_id).await?)
    }

    // -- Subtodos --

    async fn list_subtodos(&self) -> Result<Vec<Subtodo>, ServiceError> {
        non_empty(self.db.list_subtodos().await?, "subtodos")
    }

    async fn get_subtodo(&self, id: &str) -> Result<Subtodo, ServiceError> {
        self.db.get_subtodo(id).await.map_err(missing("subtodo"))
    }

    async fn create_subtodo(&self, input: &CreateSubtodo) -> Result<Subtodo, ServiceError> {
        let title = require_field("Title", &input.title)?.to_string();
        let todo_id = require_field("Todo id", &input.todo_id)?.to_string();
        self.require_todo(&todo_id).await?;

        Ok(self
            .db
            .create_subtodo(&CreateSubtodo { todo_id, title })
            .await?)
    }

    async fn update_subtodo(
        &self,
        id: &str,
        update: &UpdateSubtodo,
    ) -> Result<Subtodo, ServiceError> {
        if update.is_empty() {
            return Err(ServiceError::InvalidInput("Nothing to update".into()));
        }
        let title = update
            .title
            .as_deref()
            .map(|t| require_field("Title", t).map(str::to_string))
            .transpose()?;

        self.db
            .update_subtodo(
                id,
                &UpdateSubtodo {
                    title,
                    is_completed: update.is_completed,
                },
            )
            .await
            .map_err(missing("subtodo"))
    }

    async fn toggle_subtodo(&self, id: &str) -> Result<Subtodo, ServiceError> {
        self.db.toggle_subtodo(id).await.map_err(missing("subtodo"))
    }

    async fn delete_subtodo(&self, id: &str) -> Result<Subtodo, ServiceError> {
        self.db.delete_subtodo(id).await.map_err(missing("subtodo"))
    }

    async fn delete_all_subtodos(&self) -> Result<usize, ServiceError> {
        deleted_any(self.db.delete_all_subtodos().await?, "subtodos")
    }
}
