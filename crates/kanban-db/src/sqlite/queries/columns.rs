use std::collections::HashSet;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

use kanban_core::column::{Column, ColumnDraft, CreateColumn};

use super::super::{not_found_or, SqliteDatabase, SqliteResultExt};
use super::purge_column_children;
use crate::DbError;

fn row_to_column(row: &Row) -> rusqlite::Result<Column> {
    Ok(Column {
        id: row.get("id")?,
        board_id: row.get("board_id")?,
        name: row.get("name")?,
        position: row.get("position")?,
        created_at: row.get("created_at")?,
    })
}

pub(crate) fn load_column(conn: &Connection, id: &str) -> Result<Column, DbError> {
    conn.query_row(
        "SELECT * FROM board_columns WHERE id = ?1",
        params![id],
        row_to_column,
    )
    .map_err(not_found_or(format!("column {id}")))
}

fn board_columns(conn: &Connection, board_id: &str) -> Result<Vec<Column>, DbError> {
    let mut stmt = conn
        .prepare("SELECT * FROM board_columns WHERE board_id = ?1 ORDER BY position, rowid")
        .to_db()?;
    let columns = stmt
        .query_map(params![board_id], row_to_column)
        .to_db()?
        .collect::<Result<Vec<_>, _>>()
        .to_db()?;
    Ok(columns)
}

impl SqliteDatabase {
    pub fn create_column_sync(&self, input: &CreateColumn) -> Result<Column, DbError> {
        self.with_conn(|conn| {
            let id = kanban_core::new_id();
            let position: i64 = conn
                .query_row(
                    "SELECT COALESCE(MAX(position) + 1, 0) FROM board_columns WHERE board_id = ?1",
                    params![input.board_id],
                    |row| row.get(0),
                )
                .to_db()?;
            conn.execute(
                "INSERT INTO board_columns (id, board_id, name, position, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![id, input.board_id, input.name, position, Utc::now()],
            )
            .to_db()?;
            load_column(conn, &id)
        })
    }

    pub fn get_column_sync(&self, id: &str) -> Result<Column, DbError> {
        self.with_conn(|conn| load_column(conn, id))
    }

    pub fn find_column_by_name_sync(
        &self,
        board_id: &str,
        name: &str,
    ) -> Result<Option<Column>, DbError> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT * FROM board_columns WHERE board_id = ?1 AND name = ?2",
                params![board_id, name],
                row_to_column,
            )
            .optional()
            .to_db()
        })
    }

    pub fn list_columns_sync(&self) -> Result<Vec<Column>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT * FROM board_columns ORDER BY board_id, position, rowid")
                .to_db()?;
            let columns = stmt
                .query_map([], row_to_column)
                .to_db()?
                .collect::<Result<Vec<_>, _>>()
                .to_db()?;
            Ok(columns)
        })
    }

    pub fn list_board_columns_sync(&self, board_id: &str) -> Result<Vec<Column>, DbError> {
        self.with_conn(|conn| board_columns(conn, board_id))
    }

    pub fn update_column_sync(&self, id: &str, name: &str) -> Result<Column, DbError> {
        self.with_conn(|conn| {
            let changed = conn
                .execute(
                    "UPDATE board_columns SET name = ?1 WHERE id = ?2",
                    params![name, id],
                )
                .to_db()?;
            if changed == 0 {
                return Err(DbError::NotFound(format!("column {id}")));
            }
            load_column(conn, id)
        })
    }

    /// Make the board's columns match `drafts`, in order.
    ///
    /// Drafts with an id rename and reposition that column, drafts without one
    /// create a column, and columns not mentioned are deleted with their todos.
    pub fn replace_board_columns_sync(
        &self,
        board_id: &str,
        drafts: &[ColumnDraft],
    ) -> Result<Vec<Column>, DbError> {
        self.with_tx(|conn| {
            let existing = board_columns(conn, board_id)?;
            let existing_ids: HashSet<&str> = existing.iter().map(|c| c.id.as_str()).collect();
            let kept: HashSet<&str> = drafts.iter().filter_map(|d| d.id.as_deref()).collect();

            if let Some(unknown) = kept.iter().find(|id| !existing_ids.contains(*id)) {
                return Err(DbError::NotFound(format!("column {unknown} on board {board_id}")));
            }

            for column in existing.iter().filter(|c| !kept.contains(c.id.as_str())) {
                purge_column_children(conn, &column.id)?;
                conn.execute("DELETE FROM board_columns WHERE id = ?1", params![column.id])
                    .to_db()?;
            }

            // Park kept names on unique placeholders so swapped names do not
            // trip the (board_id, name) index mid-update.
            for id in &kept {
                conn.execute(
                    "UPDATE board_columns SET name = char(0) || id WHERE id = ?1",
                    params![id],
                )
                .to_db()?;
            }

            let now = Utc::now();
            for (position, draft) in drafts.iter().enumerate() {
                let position = position as i64;
                match &draft.id {
                    Some(id) => {
                        conn.execute(
                            "UPDATE board_columns SET name = ?1, position = ?2 WHERE id = ?3",
                            params![draft.name, position, id],
                        )
                        .to_db()?;
                    }
                    None => {
                        conn.execute(
                            "INSERT INTO board_columns (id, board_id, name, position, created_at)
                             VALUES (?1, ?2, ?3, ?4, ?5)",
                            params![kanban_core::new_id(), board_id, draft.name, position, now],
                        )
                        .to_db()?;
                    }
                }
            }

            board_columns(conn, board_id)
        })
    }

    pub fn delete_column_sync(&self, id: &str) -> Result<Column, DbError> {
        self.with_tx(|conn| {
            let column = load_column(conn, id)?;
            let purged = purge_column_children(conn, id)?;
            conn.execute("DELETE FROM board_columns WHERE id = ?1", params![id])
                .to_db()?;
            tracing::debug!(
                "deleted column {id} with {} todos, {} subtodos",
                purged.todos,
                purged.subtodos
            );
            Ok(column)
        })
    }

    pub fn delete_all_columns_sync(&self) -> Result<usize, DbError> {
        self.with_tx(|conn| {
            conn.execute_batch(
                "DELETE FROM subtodos WHERE todo_id IN
                    (SELECT t.id FROM todos t JOIN board_columns c ON c.id = t.column_id);
                 DELETE FROM todos WHERE column_id IN (SELECT id FROM board_columns);",
            )
            .to_db()?;
            let deleted = conn.execute("DELETE FROM board_columns", []).to_db()?;
            Ok(deleted)
        })
    }
}
