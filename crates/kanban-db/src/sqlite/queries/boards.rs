use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

use kanban_core::board::{Board, CreateBoard};

use super::super::{not_found_or, SqliteDatabase, SqliteResultExt};
use super::purge_board_children;
use crate::DbError;

fn row_to_board(row: &Row) -> rusqlite::Result<Board> {
    Ok(Board {
        id: row.get("id")?,
        name: row.get("name")?,
        columns: Vec::new(),
        created_at: row.get("created_at")?,
    })
}

fn column_ids(conn: &Connection, board_id: &str) -> Result<Vec<String>, DbError> {
    let mut stmt = conn
        .prepare("SELECT id FROM board_columns WHERE board_id = ?1 ORDER BY position, rowid")
        .to_db()?;
    let ids = stmt
        .query_map(params![board_id], |row| row.get(0))
        .to_db()?
        .collect::<Result<Vec<String>, _>>()
        .to_db()?;
    Ok(ids)
}

fn with_columns(conn: &Connection, mut board: Board) -> Result<Board, DbError> {
    board.columns = column_ids(conn, &board.id)?;
    Ok(board)
}

pub(crate) fn load_board(conn: &Connection, id: &str) -> Result<Board, DbError> {
    let board = conn
        .query_row(
            "SELECT * FROM boards WHERE id = ?1",
            params![id],
            row_to_board,
        )
        .map_err(not_found_or(format!("board {id}")))?;
    with_columns(conn, board)
}

impl SqliteDatabase {
    pub fn create_board_sync(&self, input: &CreateBoard) -> Result<Board, DbError> {
        self.with_tx(|conn| {
            let id = kanban_core::new_id();
            let now = Utc::now();
            conn.execute(
                "INSERT INTO boards (id, name, created_at) VALUES (?1, ?2, ?3)",
                params![id, input.name, now],
            )
            .to_db()?;
            for (position, name) in input.columns.iter().enumerate() {
                conn.execute(
                    "INSERT INTO board_columns (id, board_id, name, position, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![kanban_core::new_id(), id, name, position as i64, now],
                )
                .to_db()?;
            }
            load_board(conn, &id)
        })
    }

    pub fn get_board_sync(&self, id: &str) -> Result<Board, DbError> {
        self.with_conn(|conn| load_board(conn, id))
    }

    pub fn find_board_by_name_sync(&self, name: &str) -> Result<Option<Board>, DbError> {
        self.with_conn(|conn| {
            let board = conn
                .query_row(
                    "SELECT * FROM boards WHERE name = ?1",
                    params![name],
                    row_to_board,
                )
                .optional()
                .to_db()?;
            board.map(|b| with_columns(conn, b)).transpose()
        })
    }

    pub fn list_boards_sync(&self) -> Result<Vec<Board>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT * FROM boards ORDER BY created_at, rowid")
                .to_db()?;
            let boards = stmt
                .query_map([], row_to_board)
                .to_db()?
                .collect::<Result<Vec<_>, _>>()
                .to_db()?;
            boards
                .into_iter()
                .map(|b| with_columns(conn, b))
                .collect()
        })
    }

    pub fn update_board_sync(&self, id: &str, name: &str) -> Result<Board, DbError> {
        self.with_conn(|conn| {
            let changed = conn
                .execute(
                    "UPDATE boards SET name = ?1 WHERE id = ?2",
                    params![name, id],
                )
                .to_db()?;
            if changed == 0 {
                return Err(DbError::NotFound(format!("board {id}")));
            }
            load_board(conn, id)
        })
    }

    pub fn delete_board_sync(&self, id: &str) -> Result<Board, DbError> {
        self.with_tx(|conn| {
            let board = load_board(conn, id)?;
            let purged = purge_board_children(conn, id)?;
            if purged.columns == 0 {
                tracing::debug!("board {id} had no columns to delete");
            }
            conn.execute("DELETE FROM boards WHERE id = ?1", params![id])
                .to_db()?;
            tracing::debug!(
                "deleted board {id} with {} columns, {} todos, {} subtodos",
                purged.columns,
                purged.todos,
                purged.subtodos
            );
            Ok(board)
        })
    }

    pub fn delete_all_boards_sync(&self) -> Result<usize, DbError> {
        self.with_tx(|conn| {
            let count: i64 = conn
                .query_row("SELECT COUNT(*) FROM boards", [], |r| r.get(0))
                .to_db()?;
            if count == 0 {
                return Ok(0);
            }
            conn.execute_batch(
                "DELETE FROM subtodos;
                 DELETE FROM todos;
                 DELETE FROM board_columns;",
            )
            .to_db()?;
            let deleted = conn.execute("DELETE FROM boards", []).to_db()?;
            tracing::debug!("{deleted} boards deleted");
            Ok(deleted)
        })
    }
}
