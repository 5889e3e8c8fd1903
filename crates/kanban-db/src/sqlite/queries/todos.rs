use chrono::Utc;
use rusqlite::{params, Connection, Row};

use kanban_core::todo::{CreateTodo, Todo};

use super::super::{not_found_or, SqliteDatabase, SqliteResultExt};
use crate::{DbError, TodoChanges};

/// Todos carry their column's name as `status`.
const SELECT_TODOS: &str = "SELECT t.*, COALESCE(c.name, '') AS status
     FROM todos t LEFT JOIN board_columns c ON c.id = t.column_id";

fn row_to_todo(row: &Row) -> rusqlite::Result<Todo> {
    Ok(Todo {
        id: row.get("id")?,
        column_id: row.get("column_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        status: row.get("status")?,
        subtodos: Vec::new(),
        created_at: row.get("created_at")?,
    })
}

fn with_subtodos(conn: &Connection, mut todo: Todo) -> Result<Todo, DbError> {
    let mut stmt = conn
        .prepare("SELECT id FROM subtodos WHERE todo_id = ?1 ORDER BY created_at, rowid")
        .to_db()?;
    todo.subtodos = stmt
        .query_map(params![todo.id], |row| row.get(0))
        .to_db()?
        .collect::<Result<Vec<String>, _>>()
        .to_db()?;
    Ok(todo)
}

pub(crate) fn load_todo(conn: &Connection, id: &str) -> Result<Todo, DbError> {
    let todo = conn
        .query_row(
            &format!("{SELECT_TODOS} WHERE t.id = ?1"),
            params![id],
            row_to_todo,
        )
        .map_err(not_found_or(format!("todo {id}")))?;
    with_subtodos(conn, todo)
}

fn query_todos(
    conn: &Connection,
    sql: &str,
    args: &[&dyn rusqlite::ToSql],
) -> Result<Vec<Todo>, DbError> {
    let mut stmt = conn.prepare(sql).to_db()?;
    let todos = stmt
        .query_map(args, row_to_todo)
        .to_db()?
        .collect::<Result<Vec<_>, _>>()
        .to_db()?;
    todos.into_iter().map(|t| with_subtodos(conn, t)).collect()
}

impl SqliteDatabase {
    pub fn create_todo_sync(&self, input: &CreateTodo) -> Result<Todo, DbError> {
        self.with_conn(|conn| {
            let id = kanban_core::new_id();
            conn.execute(
                "INSERT INTO todos (id, column_id, title, description, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![id, input.column_id, input.title, input.description, Utc::now()],
            )
            .to_db()?;
            load_todo(conn, &id)
        })
    }

    pub fn get_todo_sync(&self, id: &str) -> Result<Todo, DbError> {
        self.with_conn(|conn| load_todo(conn, id))
    }

    pub fn list_todos_sync(&self) -> Result<Vec<Todo>, DbError> {
        self.with_conn(|conn| {
            query_todos(
                conn,
                &format!("{SELECT_TODOS} ORDER BY t.created_at, t.rowid"),
                &[],
            )
        })
    }

    pub fn list_column_todos_sync(&self, column_id: &str) -> Result<Vec<Todo>, DbError> {
        self.with_conn(|conn| {
            query_todos(
                conn,
                &format!("{SELECT_TODOS} WHERE t.column_id = ?1 ORDER BY t.created_at, t.rowid"),
                &[&column_id],
            )
        })
    }

    pub fn update_todo_sync(&self, id: &str, changes: &TodoChanges) -> Result<Todo, DbError> {
        self.with_conn(|conn| {
            let mut sets = Vec::new();
            let mut param_values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

            if let Some(ref title) = changes.title {
                param_values.push(Box::new(title.clone()));
                sets.push(format!("title = ?{}", param_values.len()));
            }
            if let Some(ref description) = changes.description {
                param_values.push(Box::new(description.clone()));
                sets.push(format!("description = ?{}", param_values.len()));
            }
            if let Some(ref column_id) = changes.column_id {
                param_values.push(Box::new(column_id.clone()));
                sets.push(format!("column_id = ?{}", param_values.len()));
            }

            if sets.is_empty() {
                return load_todo(conn, id);
            }

            param_values.push(Box::new(id.to_string()));
            let sql = format!(
                "UPDATE todos SET {} WHERE id = ?{}",
                sets.join(", "),
                param_values.len()
            );
            let params_ref: Vec<&dyn rusqlite::ToSql> =
                param_values.iter().map(|p| p.as_ref()).collect();

            let changed = conn.execute(&sql, params_ref.as_slice()).to_db()?;
            if changed == 0 {
                return Err(DbError::NotFound(format!("todo {id}")));
            }
            load_todo(conn, id)
        })
    }

    pub fn delete_todo_sync(&self, id: &str) -> Result<Todo, DbError> {
        self.with_tx(|conn| {
            let todo = load_todo(conn, id)?;
            conn.execute("DELETE FROM subtodos WHERE todo_id = ?1", params![id])
                .to_db()?;
            conn.execute("DELETE FROM todos WHERE id = ?1", params![id])
                .to_db()?;
            Ok(todo)
        })
    }

    pub fn delete_all_todos_sync(&self) -> Result<usize, DbError> {
        self.with_tx(|conn| {
            conn.execute(
                "DELETE FROM subtodos WHERE todo_id IN (SELECT id FROM todos)",
                [],
            )
            .to_db()?;
            let deleted = conn.execute("DELETE FROM todos", []).to_db()?;
            Ok(deleted)
        })
    }
}
