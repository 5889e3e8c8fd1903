use chrono::Utc;
use rusqlite::{params, Connection, Row};

use kanban_core::subtodo::{CreateSubtodo, Subtodo, UpdateSubtodo};

use super::super::{not_found_or, SqliteDatabase, SqliteResultExt};
use crate::DbError;

fn row_to_subtodo(row: &Row) -> rusqlite::Result<Subtodo> {
    let is_completed: i32 = row.get("is_completed")?;
    Ok(Subtodo {
        id: row.get("id")?,
        todo_id: row.get("todo_id")?,
        title: row.get("title")?,
        is_completed: is_completed != 0,
        created_at: row.get("created_at")?,
    })
}

fn load_subtodo(conn: &Connection, id: &str) -> Result<Subtodo, DbError> {
    conn.query_row(
        "SELECT * FROM subtodos WHERE id = ?1",
        params![id],
        row_to_subtodo,
    )
    .map_err(not_found_or(format!("subtodo {id}")))
}

impl SqliteDatabase {
    pub fn create_subtodo_sync(&self, input: &CreateSubtodo) -> Result<Subtodo, DbError> {
        self.with_conn(|conn| {
            let id = kanban_core::new_id();
            conn.execute(
                "INSERT INTO subtodos (id, todo_id, title, is_completed, created_at)
                 VALUES (?1, ?2, ?3, 0, ?4)",
                params![id, input.todo_id, input.title, Utc::now()],
            )
            .to_db()?;
            load_subtodo(conn, &id)
        })
    }

    pub fn get_subtodo_sync(&self, id: &str) -> Result<Subtodo, DbError> {
        self.with_conn(|conn| load_subtodo(conn, id))
    }

    pub fn list_subtodos_sync(&self) -> Result<Vec<Subtodo>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT * FROM subtodos ORDER BY created_at, rowid")
                .to_db()?;
            let subtodos = stmt
                .query_map([], row_to_subtodo)
                .to_db()?
                .collect::<Result<Vec<_>, _>>()
                .to_db()?;
            Ok(subtodos)
        })
    }

    pub fn list_todo_subtodos_sync(&self, todo_id: &str) -> Result<Vec<Subtodo>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT * FROM subtodos WHERE todo_id = ?1 ORDER BY created_at, rowid")
                .to_db()?;
            let subtodos = stmt
                .query_map(params![todo_id], row_to_subtodo)
                .to_db()?
                .collect::<Result<Vec<_>, _>>()
                .to_db()?;
            Ok(subtodos)
        })
    }

    pub fn update_subtodo_sync(
        &self,
        id: &str,
        update: &UpdateSubtodo,
    ) -> Result<Subtodo, DbError> {
        self.with_conn(|conn| {
            let mut sets = Vec::new();
            let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

            if let Some(ref title) = update.title {
                sets.push("title = ?");
                values.push(Box::new(title.clone()));
            }
            if let Some(is_completed) = update.is_completed {
                sets.push("is_completed = ?");
                values.push(Box::new(if is_completed { 1i32 } else { 0i32 }));
            }

            if sets.is_empty() {
                return load_subtodo(conn, id);
            }

            values.push(Box::new(id.to_string()));
            let sql = format!("UPDATE subtodos SET {} WHERE id = ?", sets.join(", "));
            let params: Vec<&dyn rusqlite::ToSql> = values.iter().map(|v| v.as_ref()).collect();
            let changed = conn.execute(&sql, params.as_slice()).to_db()?;
            if changed == 0 {
                return Err(DbError::NotFound(format!("subtodo {id}")));
            }
            load_subtodo(conn, id)
        })
    }

    /// Flip `is_completed` in place. Nothing else on the row or its todo changes.
    pub fn toggle_subtodo_sync(&self, id: &str) -> Result<Subtodo, DbError> {
        self.with_conn(|conn| {
            let changed = conn
                .execute(
                    "UPDATE subtodos SET is_completed = 1 - is_completed WHERE id = ?1",
                    params![id],
                )
                .to_db()?;
            if changed == 0 {
                return Err(DbError::NotFound(format!("subtodo {id}")));
            }
            load_subtodo(conn, id)
        })
    }

    pub fn delete_subtodo_sync(&self, id: &str) -> Result<Subtodo, DbError> {
        self.with_conn(|conn| {
            let subtodo = load_subtodo(conn, id)?;
            conn.execute("DELETE FROM subtodos WHERE id = ?1", params![id])
                .to_db()?;
            Ok(subtodo)
        })
    }

    pub fn delete_all_subtodos_sync(&self) -> Result<usize, DbError> {
        self.with_conn(|conn| conn.execute("DELETE FROM subtodos", []).to_db())
    }
}
